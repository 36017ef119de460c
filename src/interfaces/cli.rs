//! Command-line front end of the diary.
//!
//! Each subcommand stands in for one view: it builds the controller, feeds
//! it the arguments as if they had been typed into the form, and prints
//! what the view would show.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    entities::{knitting_form::FormField, picture::SubResourceKind},
    utils::dates::parse_date,
};

/// knitting_diary - keep track of your knitting projects
#[derive(Debug, Parser)]
#[command(name = "knitting_diary")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to an extra configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List projects, one page at a time
    List(ListCommand),

    /// Show one project with its images
    Show(ShowCommand),

    /// Record a new project
    Create(CreateCommand),

    /// Edit a project
    Update(UpdateCommand),

    /// Delete a project
    Delete(DeleteCommand),

    /// Delete one image of a project
    DeleteImage(DeleteImageCommand),
}

impl Cli {
    /// Default `EnvFilter` directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "knitting_diary=info",
            1 => "knitting_diary=debug",
            _ => "knitting_diary=trace",
        }
    }
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// 1-based page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ShowCommand {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct CreateCommand {
    #[command(flatten)]
    pub fields: FieldArgs,

    #[command(flatten)]
    pub files: FileArgs,
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    pub id: i64,

    #[command(flatten)]
    pub fields: FieldArgs,

    #[command(flatten)]
    pub files: FileArgs,
}

#[derive(Debug, Args)]
pub struct DeleteCommand {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct DeleteImageCommand {
    #[arg(value_enum)]
    pub kind: ImageKind,

    /// Project the image belongs to
    pub record_id: i64,

    pub image_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageKind {
    Pattern,
    YarnNeedle,
    Picture,
}

impl From<ImageKind> for SubResourceKind {
    fn from(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Pattern => SubResourceKind::PatternImage,
            ImageKind::YarnNeedle => SubResourceKind::YarnNeedleImage,
            ImageKind::Picture => SubResourceKind::Picture,
        }
    }
}

/// Form fields. Only the given ones are written into the form.
#[derive(Debug, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub pattern_name_size: Option<String>,
    #[arg(long)]
    pub designer: Option<String>,
    #[arg(long)]
    pub origin_yarn: Option<String>,
    #[arg(long)]
    pub origin_gauge: Option<String>,
    #[arg(long)]
    pub origin_needle_size: Option<String>,
    #[arg(long)]
    pub origin_yardage: Option<String>,
    #[arg(long)]
    pub yarn: Option<String>,
    #[arg(long)]
    pub needles: Option<String>,
    #[arg(long)]
    pub gauge: Option<String>,
    #[arg(long)]
    pub yardage: Option<String>,
    #[arg(long)]
    pub contents: Option<String>,

    /// yyyy-MM-dd
    #[arg(long, value_parser = parse_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// yyyy-MM-dd
    #[arg(long, value_parser = parse_date_arg, conflicts_with = "clear_end_date")]
    pub end_date: Option<NaiveDate>,

    /// Remove the end date
    #[arg(long)]
    pub clear_end_date: bool,
}

impl FieldArgs {
    /// The given text fields, in form order.
    pub fn text_patches(&self) -> Vec<(FormField, &str)> {
        [
            (FormField::PatternNameSize, &self.pattern_name_size),
            (FormField::Designer, &self.designer),
            (FormField::OriginYarn, &self.origin_yarn),
            (FormField::OriginGauge, &self.origin_gauge),
            (FormField::OriginNeedleSize, &self.origin_needle_size),
            (FormField::OriginYardage, &self.origin_yardage),
            (FormField::Yarn, &self.yarn),
            (FormField::Needles, &self.needles),
            (FormField::Gauge, &self.gauge),
            (FormField::Yardage, &self.yardage),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Debug, Default, Args)]
pub struct FileArgs {
    /// Photo of the pattern
    #[arg(long, value_name = "PATH")]
    pub pattern_image: Option<PathBuf>,

    /// Photo of the yarn and needles
    #[arg(long, value_name = "PATH")]
    pub yarn_needle_image: Option<PathBuf>,

    /// Pattern PDF
    #[arg(long, value_name = "PATH")]
    pub pattern_file: Option<PathBuf>,

    /// Progress picture, repeatable
    #[arg(long = "picture", value_name = "PATH")]
    pub pictures: Vec<PathBuf>,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("`{}` is not a yyyy-MM-dd date", value))
}
