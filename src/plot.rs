use super::chart::Chart;
use super::display::{ChartViewer, SystemViewer};
use super::render;
use super::theme::Theme;
use super::{Dataset, PlotError};
use super::{DENSITY_COLUMN, METRIC_COLUMN, VERSION, VERTICES_COLUMN};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One invocation of the tool: what to call the chart, where to save it, what to read.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub output: Option<PathBuf>,
    pub input_file: PathBuf,
}

fn cli_app<'a, 'b>() -> App<'a, 'b> {
    let arg_title = Arg::with_name("title")
        .help("title of the chart")
        .short("t")
        .long("title")
        .takes_value(true)
        .empty_values(false)
        .required(true);
    let arg_output = Arg::with_name("output")
        .help("save the chart to this svg or png file instead of showing it")
        .short("o")
        .long("output")
        .takes_value(true);
    let arg_input = Arg::with_name("input_file")
        .help("csv file with the runtimes")
        .short("i")
        .long("input-file")
        .takes_value(true)
        .required_unless("INPUT")
        .conflicts_with("INPUT");
    let arg_input_pos = Arg::with_name("INPUT")
        .help("csv file with the runtimes, same as --input-file")
        .index(1);
    let sub_plot = SubCommand::with_name("plot")
        .about("plot the CSR runtime against the density, one line per vertex count")
        .arg(arg_input)
        .arg(arg_input_pos);
    App::new("csr_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot the CSR runtimes from the benchmark csv files")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(arg_title)
        .arg(arg_output)
        .subcommand(sub_plot)
}

fn request_from(cli_args: &ArgMatches) -> Result<ChartRequest, clap::Error> {
    let plot_args = cli_args.subcommand_matches("plot").ok_or_else(|| {
        clap::Error::with_description(
            "the plot subcommand is required",
            clap::ErrorKind::MissingSubcommand,
        )
    })?;
    let input = plot_args
        .value_of_os("input_file")
        .or_else(|| plot_args.value_of_os("INPUT"))
        .ok_or_else(|| {
            clap::Error::with_description(
                "an input file is required",
                clap::ErrorKind::MissingRequiredArgument,
            )
        })?;
    Ok(ChartRequest {
        title: String::from(cli_args.value_of("title").unwrap_or_default()),
        output: cli_args.value_of_os("output").map(PathBuf::from),
        input_file: PathBuf::from(input),
    })
}

/// Takes the CLI arguments that control the plotting, exits on bad arguments.
pub fn parse_cli() -> ChartRequest {
    let cli_args = cli_app().get_matches();
    match request_from(&cli_args) {
        Ok(request) => request,
        Err(e) => e.exit(),
    }
}

/// same as parse_cli but from explicit arguments, the first one is the binary name
pub fn parse_cli_from<I, T>(args: I) -> Result<ChartRequest, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = cli_app().get_matches_from_safe(args)?;
    request_from(&cli_args)
}

/// Loads a runtime csv and charts the CSR runtime against the density.
#[derive(Debug, Clone)]
pub struct PlotCommand {
    title: String,
    output: Option<PathBuf>,
    theme: Theme,
}

impl PlotCommand {
    pub fn new<S: Into<String>>(title: S, output: Option<PathBuf>) -> PlotCommand {
        PlotCommand {
            title: title.into(),
            output,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> PlotCommand {
        self.theme = theme;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// dumps the table to stdout and shows the chart on screen, or saves it if an output is set
    pub fn plot<P: AsRef<Path>>(&self, input_file: P) -> Result<(), PlotError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.plot_with(input_file, &mut out, &mut SystemViewer::new())
    }

    /// Same as plot with the diagnostic stream and the viewer supplied by the caller.
    ///
    /// The required columns are checked right after loading,
    /// so a bad file produces neither the dump nor a chart.
    pub fn plot_with<P, W, V>(
        &self,
        input_file: P,
        diagnostics: &mut W,
        viewer: &mut V,
    ) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
        W: Write,
        V: ChartViewer,
    {
        let input_file = input_file.as_ref();
        log::info!("read data from {}", input_file.display());
        let dataset = Dataset::from_csv(input_file)?;
        dataset.require_columns(&[DENSITY_COLUMN, METRIC_COLUMN, VERTICES_COLUMN])?;
        let chart = Chart::relational_line(
            &dataset,
            &self.title,
            DENSITY_COLUMN,
            METRIC_COLUMN,
            VERTICES_COLUMN,
        )?;

        writeln!(diagnostics, "{:?}", dataset.names())?;
        write!(diagnostics, "{}", dataset)?;
        diagnostics.flush()?;

        log::debug!("{} rows in {} series", dataset.len(), chart.series.len());
        match &self.output {
            Some(fout) => render::save(&chart, &self.theme, fout),
            None => viewer.show(&chart, &self.theme),
        }
    }
}
