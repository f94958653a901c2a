use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// A requested annotation plugin. The two known plugins ship with an
/// auxiliary data file installed in the plugin directory; any other
/// plugin takes its data file (if it has one) from the job's resource
/// map, keyed by the lowercased plugin name. Known names are matched
/// case sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Plugin {
    LofTool,
    ExacPli,
    Other(String),
}

impl From<String> for Plugin {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LoFtool" => Plugin::LofTool,
            "ExACpLI" => Plugin::ExacPli,
            _ => Plugin::Other(s),
        }
    }
}

impl From<&str> for Plugin {
    fn from(s: &str) -> Self {
        Plugin::from(s.to_owned())
    }
}

impl Plugin {
    pub fn name(&self) -> &str {
        match self {
            Plugin::LofTool => "LoFtool",
            Plugin::ExacPli => "ExACpLI",
            Plugin::Other(s) => s,
        }
    }
    /// Data file installed alongside the plugin itself, if any.
    pub fn bundled_data(&self) -> Option<&'static str> {
        match self {
            Plugin::LofTool => Some("LoFtool_scores.txt"),
            Plugin::ExacPli => Some("ExACpLI_values.txt"),
            Plugin::Other(_) => None,
        }
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bcf,
    Vcf,
    Json,
    Tab,
}

impl OutputFormat {
    pub fn flag(&self) -> &'static str {
        match self {
            OutputFormat::Bcf => "--bcf",
            OutputFormat::Vcf => "--vcf",
            OutputFormat::Json => "--json",
            OutputFormat::Tab => "--tab",
        }
    }
}

/// Output handling inferred from the requested output path. A trailing
/// .gz asks the annotation tool to compress its output and is stripped
/// before the extension is inspected; an unrecognized extension leaves
/// the format choice to the tool itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputType {
    pub format: Option<OutputFormat>,
    pub compress: bool,
}

impl OutputType {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path.as_ref().to_string_lossy();
        let (stem, compress) = match name.strip_suffix(".gz") {
            Some(s) => (s, true),
            None => (name.as_ref(), false),
        };
        let format = if stem.ends_with(".bcf") {
            Some(OutputFormat::Bcf)
        } else if stem.ends_with(".vcf") {
            Some(OutputFormat::Vcf)
        } else if stem.ends_with(".json") {
            Some(OutputFormat::Json)
        } else if stem.ends_with(".tsv") {
            Some(OutputFormat::Tab)
        } else {
            None
        };
        OutputType { format, compress }
    }
}

pub const SIGTERM: usize = signal_hook::consts::SIGTERM as usize;
pub const SIGINT: usize = signal_hook::consts::SIGINT as usize;
pub const SIGQUIT: usize = signal_hook::consts::SIGQUIT as usize;
pub const SIGHUP: usize = signal_hook::consts::SIGHUP as usize;

pub fn signal_msg(sig: usize) -> &'static str {
    match sig {
        SIGTERM => "SIGTERM",
        SIGINT => "SIGINT",
        SIGHUP => "SIGHUP",
        SIGQUIT => "SIGQUIT",
        _ => "UNKNOWN",
    }
}
