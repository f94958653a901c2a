use std::path::PathBuf;

use clap::ArgMatches;

use crate::common::defs::Plugin;
use crate::config::{self, JobFile, VepJob};

fn get_path(m: &ArgMatches, name: &str) -> Option<PathBuf> {
    m.get_one::<PathBuf>(name).cloned()
}

pub fn handle_options(m: &ArgMatches) -> Result<VepJob, String> {
    let job_file = match m.get_one::<PathBuf>("job_file") {
        Some(p) => {
            debug!("Reading job parameters from {}", p.display());
            JobFile::from_path(p)?
        }
        None => JobFile::default(),
    };

    let calls = get_path(m, "calls").or(job_file.calls).ok_or(
        "No input call set supplied.  Use the <calls> argument or the job file key 'calls'",
    )?;
    let output = get_path(m, "output")
        .or(job_file.output)
        .ok_or("No output file supplied.  Use --output or the job file key 'output'")?;
    let stats = get_path(m, "stats")
        .or(job_file.stats)
        .ok_or("No stats file supplied.  Use --stats or the job file key 'stats'")?;
    let plugins_dir = get_path(m, "plugins_dir").or(job_file.plugins_dir).ok_or(
        "No plugin directory supplied.  Use --plugins-dir or the job file key 'plugins_dir'",
    )?;
    let threads = m
        .get_one::<usize>("threads")
        .copied()
        .or(job_file.threads)
        .unwrap_or(1);
    let extra = m.get_one::<String>("extra").cloned().or(job_file.extra);
    let plugins: Vec<Plugin> = match m.get_many::<String>("plugin") {
        Some(v) => v.map(|s| Plugin::from(s.as_str())).collect(),
        None => job_file.plugins,
    };

    let mut resources = job_file.resources;
    for key in ["cache", "fasta", "gff"] {
        if let Some(p) = get_path(m, key) {
            resources.insert(key.to_owned(), p);
        }
    }
    if let Some(vals) = m.get_many::<String>("plugin_data") {
        for s in vals {
            match s.split_once('=') {
                Some((name, path)) if !name.is_empty() && !path.is_empty() => {
                    trace!("Registering data file {} for plugin {}", path, name);
                    resources.insert(name.to_lowercase(), PathBuf::from(path));
                }
                _ => {
                    return Err(format!(
                        "Could not parse plugin data argument '{}' (expected NAME=PATH)",
                        s
                    ))
                }
            }
        }
    }

    let log = get_path(m, "log").or(job_file.log);
    let bcftools = config::find_tool(
        "bcftools",
        m.get_one::<PathBuf>("bcftools")
            .map(|p| p.as_path())
            .or(job_file.bcftools.as_deref()),
    )?;
    let vep = config::find_tool(
        "vep",
        m.get_one::<PathBuf>("vep")
            .map(|p| p.as_path())
            .or(job_file.vep.as_deref()),
    )?;
    let dry_run = m.get_flag("dry_run");

    if !calls.exists() {
        warn!(
            "Input call set {} is not present or not accessible",
            calls.display()
        );
    }

    let job = VepJob {
        calls,
        output,
        stats,
        threads,
        extra,
        plugins,
        plugins_dir,
        resources,
        log,
        dry_run,
        bcftools,
        vep,
    };
    debug!("Annotation job: {:?}", job);
    Ok(job)
}
