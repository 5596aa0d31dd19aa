use clap::Parser;
use log::error;

use gptl10n::cli::{self, TranslateArgs};
use gptl10n::drivers::translate::{self, TranslateJob};
use gptl10n::CompletionBroker;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

async fn run(args: TranslateArgs)
  -> Result<(), gptl10n::Error>
{   let settings = args.common.load_settings()?;
    let config = args.common.broker_config(&settings, DEFAULT_MODEL)?;
    println!("Language code set to: {}", args.language);

    let input = match args.catalog.clone()
    {   Some(path) => path
      , None => {
          let cwd = std::env::current_dir()?;
          translate::find_catalog(&cwd).ok_or_else(|| {
            gptl10n::Error::InvalidConfiguration(format!(
              "No {} found in the current directory and its subdirectories",
              translate::CATALOG_FILE_NAME
            ))
          })?
        }
    };
    println!("Using catalog: {}", input.display());

    if args.output.is_none()
      && !args.common.no_confirmation
      && !cli::confirm_overwrite_stdin("the catalog")?
    {   return Err(gptl10n::Error::Aborted);
    }
    let output = args.output.clone().unwrap_or_else(|| input.clone());

    let job = TranslateJob::new(args.language.clone())
      .with_app_context(args.app_context.clone().or(settings.app_context))
      .with_batch_size(args.batch_size);

    let mut broker = CompletionBroker::new(&config)?;
    let summary = translate::translate_file(
      &mut broker, &input, &output, &job
    ).await?;
    println!(
      "Translated {} of {} entries in {} requests.",
      summary.translated, summary.pending, summary.batches
    );
    Ok(())
}

#[tokio::main]
async fn main()
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = TranslateArgs::parse();
    if let Err(e) = run(args).await
    {   error!("translate-localization failed: {}", e);
        eprintln!("{}\nAborting.", e);
        std::process::exit(1);
    }
}
