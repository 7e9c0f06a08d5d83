//! CLI definition and dispatch.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::{io::FontFile, parallel::run_parallel, stat::StatJob};

#[derive(Parser, Debug)]
#[command(name = "statmake")]
#[command(about = "Generate STAT tables for variable fonts from a Stylespace")]
pub struct Cli {
    /// Stylespace file; read from the designspace lib when omitted.
    #[arg(long)]
    pub stylespace: Option<PathBuf>,
    /// Designspace document providing the additional locations.
    #[arg(short = 'm', long)]
    pub designspace: PathBuf,
    /// Write the font here instead of overwriting it (single font only).
    #[arg(long)]
    pub output_path: Option<PathBuf>,
    /// Print the generated records instead of writing fonts.
    #[arg(long)]
    pub dump: bool,
    /// Variable fonts to process.
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if self.output_path.is_some() && self.fonts.len() > 1 {
            bail!("--output-path can only be used with a single font");
        }
        let job = StatJob::load(&self.designspace, self.stylespace.as_deref())?;

        if self.dump {
            for font in &self.fonts {
                let data = FontFile::new(font).read()?;
                println!("{}", font.display());
                print!("{}", job.dump(&data)?);
            }
            return Ok(());
        }

        match &self.output_path {
            Some(output) => job.apply_to(&FontFile::new(&self.fonts[0]), &FontFile::new(output)),
            None => run_parallel("statmake", &self.fonts, |path| {
                FontFile::new(path).transform(|data| job.apply(data))
            })
            .ok_or_bail("STAT generation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from([
            "statmake",
            "--stylespace",
            "Test.stylespace",
            "-m",
            "Test.designspace",
            "A.ttf",
            "B.ttf",
        ])
        .unwrap();
        assert_eq!(cli.stylespace, Some(PathBuf::from("Test.stylespace")));
        assert_eq!(cli.designspace, PathBuf::from("Test.designspace"));
        assert_eq!(cli.fonts.len(), 2);
        assert!(!cli.dump);
    }

    #[test]
    fn designspace_and_font_required() {
        assert!(Cli::try_parse_from(["statmake", "A.ttf"]).is_err());
        assert!(Cli::try_parse_from(["statmake", "-m", "Test.designspace"]).is_err());
    }

    #[test]
    fn output_path_needs_single_font() {
        let cli = Cli::try_parse_from([
            "statmake",
            "-m",
            "Test.designspace",
            "--output-path",
            "out.ttf",
            "A.ttf",
            "B.ttf",
        ])
        .unwrap();
        let err = cli.run().unwrap_err();
        assert!(err.to_string().contains("--output-path"));
    }
}
