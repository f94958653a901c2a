use std::collections::HashMap;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::defs::Plugin;

pub mod cache;

/// Parameters for one annotation job. Built once by cli::options from
/// the command line plus an optional JSON job file, then read only.
#[derive(Debug)]
pub struct VepJob {
    pub calls: PathBuf,
    pub output: PathBuf,
    pub stats: PathBuf,
    pub threads: usize,
    pub extra: Option<String>,
    pub plugins: Vec<Plugin>,
    pub plugins_dir: PathBuf,
    pub resources: HashMap<String, PathBuf>,
    pub log: Option<PathBuf>,
    pub dry_run: bool,
    pub bcftools: PathBuf,
    pub vep: PathBuf,
}

impl VepJob {
    /// Look up a logical resource (fasta, gff, cache or a per-plugin
    /// data file registered under the lowercased plugin name). An empty
    /// path counts as absent.
    pub fn resource(&self, name: &str) -> Option<&Path> {
        self.resources
            .get(name)
            .map(|p| p.as_path())
            .filter(|p| !p.as_os_str().is_empty())
    }
    pub fn fasta(&self) -> Option<&Path> {
        self.resource("fasta")
    }
    pub fn gff(&self) -> Option<&Path> {
        self.resource("gff")
    }
    pub fn cache(&self) -> Option<&Path> {
        self.resource("cache")
    }
}

/// On-disk JSON form of the job parameters. All fields are optional;
/// values given on the command line take precedence field by field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobFile {
    pub calls: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub stats: Option<PathBuf>,
    pub threads: Option<usize>,
    pub extra: Option<String>,
    pub plugins: Vec<Plugin>,
    pub plugins_dir: Option<PathBuf>,
    pub resources: HashMap<String, PathBuf>,
    pub log: Option<PathBuf>,
    pub bcftools: Option<PathBuf>,
    pub vep: Option<PathBuf>,
}

impl JobFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .map_err(|e| format!("Couldn't open job file {}: {}", path.display(), e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("Couldn't parse job file {}: {}", path.display(), e))
    }
}

/// Resolve an external tool, either from an explicit path or by
/// searching PATH.
pub fn find_tool(name: &str, explicit: Option<&Path>) -> Result<PathBuf, String> {
    match explicit {
        Some(p) => {
            if p.exists() {
                Ok(p.to_owned())
            } else {
                Err(format!(
                    "{} executable not found at {}",
                    name,
                    p.display()
                ))
            }
        }
        None => utils::find_exec_path(name)
            .ok_or_else(|| format!("Couldn't find {} executable in PATH", name)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn job_file_parses_plugins_and_resources() -> Result<(), String> {
        let tmp = tempfile::tempdir().map_err(|e| e.to_string())?;
        let path = tmp.path().join("job.json");
        fs::write(
            &path,
            r#"{
                "calls": "calls.bcf",
                "output": "out/annotated.vcf.gz",
                "stats": "out/annotated.stats.html",
                "threads": 4,
                "plugins": ["LoFtool", "CADD"],
                "plugins_dir": "/opt/vep/plugins",
                "resources": {
                    "cache": "/data/cache",
                    "cadd": "/data/cadd.vcf"
                }
            }"#,
        )
        .map_err(|e| e.to_string())?;
        let jf = JobFile::from_path(&path)?;
        assert_eq!(jf.calls.as_deref(), Some(Path::new("calls.bcf")));
        assert_eq!(jf.threads, Some(4));
        assert_eq!(
            jf.plugins,
            vec![Plugin::LofTool, Plugin::Other("CADD".to_owned())]
        );
        assert_eq!(
            jf.resources.get("cadd").map(|p| p.as_path()),
            Some(Path::new("/data/cadd.vcf"))
        );
        assert!(jf.extra.is_none());
        Ok(())
    }

    #[test]
    fn job_file_errors_name_the_file() {
        let err = JobFile::from_path("/no/such/job.json").expect_err("missing file");
        assert!(err.contains("/no/such/job.json"));
    }

    #[test]
    fn explicit_tool_path_must_exist() {
        assert!(find_tool("sh", Some(Path::new("/bin/sh"))).is_ok());
        assert!(find_tool("sh", Some(Path::new("/no/such/sh"))).is_err());
    }
}
