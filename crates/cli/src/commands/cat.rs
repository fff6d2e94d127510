use crate::app::SourceArgs;
use clap::Args;
use miette::IntoDiagnostic;
use pkgsource::{FileContent, LoadOptions, LoaderFactory, LoaderProtocol};
use std::io::{self, Write};

#[derive(Args, Clone, Debug)]
pub struct CatArgs {
    #[arg(required = true, help = "File to print, relative to the source root")]
    pub file: String,

    #[arg(long, help = "Parse the file as JSON and pretty print it")]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[tracing::instrument(skip_all)]
pub async fn cat(factory: &LoaderFactory, args: CatArgs) -> miette::Result<()> {
    let loader = factory.create(args.source.to_request()).await?;
    let options = args.json.then(LoadOptions::json);
    let content = loader.load_file(&args.file, options.as_ref()).await?;

    let mut stdout = io::stdout().lock();

    match &content {
        FileContent::Bytes(bytes) => stdout.write_all(bytes).into_diagnostic()?,
        FileContent::Json(_) => writeln!(stdout, "{}", content.to_text()).into_diagnostic()?,
    };

    stdout.flush().into_diagnostic()?;

    Ok(())
}
