use clap::Parser;
use std::path::PathBuf;

use post_pdf::handoff::{Action, Export, Exporter};
use post_pdf::posts::PostStore;
use post_pdf::{PostRecord, RenderConfig};

#[derive(Parser)]
#[command(name = "post-pdf", about = "Render a blog post to PDF")]
struct Args {
    /// Post JSON file, or a slug/id from the demo store with --seed
    input: String,
    /// Output PDF file (defaults to <slug>.pdf)
    output: Option<PathBuf>,
    /// Look INPUT up in the built-in demo posts
    #[arg(long)]
    seed: bool,
    /// Leave out the DEMO watermark
    #[arg(long)]
    no_watermark: bool,
    /// Open the PDF in a viewer instead of saving it
    #[arg(long)]
    preview: bool,
}

fn load(args: &Args) -> Result<PostRecord, String> {
    if args.seed {
        let mut store = PostStore::seeded();
        return store
            .get(&args.input)
            .map(|reply| reply.body)
            .map_err(|e| format!("{}: {}", args.input, e.message));
    }
    let path = PathBuf::from(&args.input);
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("not a file: {}", path.display()));
    }
    post_pdf::load_post(&path).map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let post = match load(&args) {
        Ok(post) => post,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let config = RenderConfig {
        watermark_enabled: !args.no_watermark,
        ..RenderConfig::default()
    };
    let exporter = Exporter::new(config);

    let action = if args.preview {
        Action::Preview
    } else {
        Action::Download(
            args.output
                .clone()
                .unwrap_or_else(|| PathBuf::from(post.pdf_filename())),
        )
    };

    match exporter.export(&post, action) {
        Ok(Export::Saved(path)) => println!("Wrote {}", path.display()),
        Ok(Export::Opened(transient)) => {
            println!(
                "Opened {}; press Enter to discard it",
                transient.path().display()
            );
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
            if let Err(e) = transient.revoke() {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to generate PDF: {e}");
            std::process::exit(1);
        }
    }
}
