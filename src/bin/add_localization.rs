use clap::Parser;
use log::{debug, error};

use gptl10n::cli::{self, AddLocalizationArgs};
use gptl10n::drivers::rewrite::{self, RewriteJob};
use gptl10n::prompt::LineStyle;
use gptl10n::CompletionBroker;

// Needs a model with a large token count
const DEFAULT_MODEL: &str = "gpt-4-0613";

async fn run(args: AddLocalizationArgs)
  -> Result<(), gptl10n::Error>
{   let pairs = rewrite::discover_pairs(
      &args.paths
    , args.output.as_deref()
    )?;
    debug!("{} files to localize", pairs.len());

    let settings = args.common.load_settings()?;
    let config = args.common.broker_config(&settings, DEFAULT_MODEL)?;

    if args.output.is_none()
      && !args.common.no_confirmation
      && !cli::confirm_overwrite_stdin("the swift files")?
    {   return Err(gptl10n::Error::Aborted);
    }

    let mut broker = CompletionBroker::new(&config)?;
    let job = RewriteJob::new(
      LineStyle::from_single_line_flag(args.single_line_modifications)
    );
    let done = rewrite::run(&mut broker, &pairs, &job).await?;
    println!("Localized {} files.", done);
    Ok(())
}

#[tokio::main]
async fn main()
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = AddLocalizationArgs::parse();
    if let Err(e) = run(args).await
    {   error!("add-localization failed: {}", e);
        eprintln!("{}\nAborting.", e);
        std::process::exit(1);
    }
}
