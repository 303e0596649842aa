use clap::Parser;

/// Projection of a two-candidate runoff from first-round survey data.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration file: survey file, column names, contenders and rules.
    /// Relative paths in the configuration are resolved from the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The survey spreadsheet (.ods, .xlsx, .xls). Setting this option overrides the path that
    /// may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the projection will be written in JSON format
    /// to the given location at the end of the session.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a projection summary in JSON format. If provided, the
    /// computed summary is checked against it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default: first worksheet) The name of the worksheet holding the survey.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the projection is computed with the default parameters, without
    /// starting the interactive session.
    #[clap(long, takes_value = false)]
    pub batch: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
