use crate::app::SourceArgs;
use clap::Args;
use pkgsource::{LoaderFactory, LoaderProtocol};

#[derive(Args, Clone, Debug)]
pub struct CommitArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[tracing::instrument(skip_all)]
pub async fn commit(factory: &LoaderFactory, args: CommitArgs) -> miette::Result<()> {
    let loader = factory.create(args.source.to_request()).await?;

    println!("{}", loader.get_commit().await?);

    Ok(())
}
