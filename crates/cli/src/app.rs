use crate::commands::{CatArgs, CommitArgs};
use clap::builder::styling::{Color, Style, Styles};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pkgsource::LoaderRequest;
use starbase_styles::color::Color as ColorType;
use std::fmt::{Display, Error, Formatter};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "{}",
            match self {
                LogLevel::Off => "off",
                LogLevel::Error => "error",
                LogLevel::Warn => "warn",
                LogLevel::Info => "info",
                LogLevel::Debug => "debug",
                LogLevel::Trace => "trace",
            }
        )?;

        Ok(())
    }
}

fn fg(ty: ColorType) -> Style {
    Style::new().fg_color(Some(Color::from(ty as u8)))
}

fn create_styles() -> Styles {
    Styles::default()
        .error(fg(ColorType::Red))
        .header(Style::new().bold())
        .invalid(fg(ColorType::Yellow))
        .literal(fg(ColorType::Pink)) // args, options, etc
        .placeholder(fg(ColorType::GrayLight))
        .usage(fg(ColorType::Purple).bold())
        .valid(fg(ColorType::Green))
}

#[derive(Debug, Parser)]
#[command(
    name = "pkgsource",
    version,
    about,
    long_about = None,
    disable_help_subcommand = true,
    propagate_version = true,
    next_line_help = false,
    styles = create_styles()
)]
pub struct App {
    #[arg(
        value_enum,
        long,
        global = true,
        env = "PKGSOURCE_LOG",
        help = "Lowest log level to output"
    )]
    pub log: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(
        name = "cat",
        about = "Print a file from the source.",
        long_about = "Print a file from the source. Remote files are read from the default branch of the repository."
    )]
    Cat(CatArgs),

    #[command(
        name = "commit",
        about = "Print the commit the source currently points to."
    )]
    Commit(CommitArgs),
}

/// Where to read from. Defaults to the current directory.
#[derive(Args, Clone, Debug, Default)]
#[group(multiple = false)]
pub struct SourceArgs {
    #[arg(long, help = "Local git checkout containing a package.json")]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Repository URL or owner/name shorthand")]
    pub repository: Option<String>,

    #[arg(long, help = "Package name to resolve through the registry")]
    pub package: Option<String>,
}

impl SourceArgs {
    pub fn to_request(&self) -> LoaderRequest {
        let request = LoaderRequest {
            path: self.path.clone(),
            repository: self.repository.clone(),
            package_name: self.package.clone(),
        };

        if request == LoaderRequest::default() {
            LoaderRequest::from_path(".")
        } else {
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verifies_command() {
        App::command().debug_assert();
    }

    #[test]
    fn defaults_to_current_dir() {
        let app = App::try_parse_from(["pkgsource", "commit"]).unwrap();

        let Commands::Commit(args) = app.command else {
            panic!("expected commit");
        };

        assert_eq!(args.source.to_request(), LoaderRequest::from_path("."));
    }

    #[test]
    fn parses_package_source() {
        let app = App::try_parse_from([
            "pkgsource",
            "cat",
            "package.json",
            "--json",
            "--package",
            "left-pad",
        ])
        .unwrap();

        let Commands::Cat(args) = app.command else {
            panic!("expected cat");
        };

        assert_eq!(args.file, "package.json");
        assert!(args.json);
        assert_eq!(
            args.source.to_request(),
            LoaderRequest::from_package("left-pad")
        );
    }

    #[test]
    fn rejects_multiple_sources() {
        assert!(
            App::try_parse_from([
                "pkgsource",
                "commit",
                "--repository",
                "foo/bar",
                "--package",
                "left-pad"
            ])
            .is_err()
        );
    }
}
