use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::{thread, time};

use crate::common::defs::{signal_msg, SIGHUP, SIGINT, SIGQUIT, SIGTERM};

/// An ordered chain of external commands. Stdout of each stage is piped
/// into the next stage; the first stage gets a null stdin and the last
/// stage inherits stdout. Each stage is a command path plus a list of
/// argument tokens handed directly to the process spawning interface,
/// so nothing is ever interpreted by a shell.
pub struct Pipeline<'a> {
    stage: Vec<(&'a Path, Vec<OsString>)>,
    log: Option<PathBuf>,
    expected_outputs: Vec<&'a Path>,
}

impl<'a> Pipeline<'a> {
    pub fn new() -> Self {
        Pipeline {
            stage: Vec::new(),
            log: None,
            expected_outputs: Vec::new(),
        }
    }
    // Add pipeline stage (command + argument tokens)
    pub fn add_stage(&mut self, command: &'a Path, args: Vec<OsString>) -> &mut Pipeline<'a> {
        self.stage.push((command, args));
        self
    }
    // Send stderr of all pipeline stages to file
    pub fn log_file(&mut self, file: PathBuf) -> &mut Pipeline<'a> {
        self.log = Some(file);
        self
    }
    // Add expected output file to pipeline.  If the pipeline finishes
    // with an error, the expected output files will be deleted
    pub fn add_output(&mut self, file: &'a Path) -> &mut Pipeline<'a> {
        self.expected_outputs.push(file);
        self
    }
    // Execute the pipeline
    pub fn run(&mut self, sig: Arc<AtomicUsize>) -> Result<(), String> {
        let log_file = match &self.log {
            Some(file) => {
                let f = fs::File::create(file)
                    .map_err(|e| format!("Couldn't open log file {}: {}", file.display(), e))?;
                Some(f)
            }
            None => None,
        };
        self.do_run(sig, log_file).map_err(|e| {
            for file in self.expected_outputs.iter() {
                if file.exists() {
                    warn!("Removing output file {}", file.display());
                    let _ = fs::remove_file(file);
                }
            }
            e
        })
    }
    fn do_run(&mut self, sig: Arc<AtomicUsize>, log: Option<fs::File>) -> Result<(), String> {
        if self.stage.is_empty() {
            return Err("Error - Empty pipeline".to_string());
        }
        info!("Launch:\n\t{}", self);
        let last = self.stage.len() - 1;
        let mut cinfo: Vec<(Child, &'a Path)> = Vec::new();
        for (ix, (com, args)) in self.stage.drain(..).enumerate() {
            let mut cc = Command::new(com);
            if let Some((prev, _)) = cinfo.last_mut() {
                cc.stdin(prev.stdout.take().unwrap());
            } else {
                cc.stdin(Stdio::null());
            }
            if let Some(lfile) = log.as_ref() {
                if let Ok(f) = lfile.try_clone() {
                    cc.stderr(f);
                }
            }
            if ix < last {
                cc.stdout(Stdio::piped());
            }
            if !args.is_empty() {
                cc.args(args.iter());
            }
            let child = cc.spawn().map_err(|e| {
                format!(
                    "Error - problem launching command {}: {}",
                    com.display(),
                    e
                )
            })?;
            trace!("Launched pipeline command {}", com.display());
            cinfo.push((child, com));
        }
        match wait_sub_proc(sig.clone(), &mut cinfo) {
            Some(err_com) => match get_signal(sig) {
                0 => Err(err_com),
                s => Err(format!("Pipeline terminated with a {} signal", signal_msg(s))),
            },
            None => {
                debug!("Pipeline terminated successfully");
                Ok(())
            }
        }
    }
}

impl<'a> fmt::Display for Pipeline<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (ix, (com, args)) in self.stage.iter().enumerate() {
            if ix > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", com.display())?;
            for arg in args.iter() {
                write!(f, " {}", arg.to_string_lossy())?;
            }
        }
        Ok(())
    }
}

fn wait_sub_proc(sig: Arc<AtomicUsize>, cinfo: &mut Vec<(Child, &Path)>) -> Option<String> {
    let mut err_com = None;
    let delay = time::Duration::from_millis(250);
    // Wait from the back of the pipeline; if a stage failed, kill the
    // stages still upstream of it
    for (child, com) in cinfo.iter_mut().rev() {
        if err_com.is_some() {
            trace!("Sending kill signal to {} command", com.display());
            let _ = child.kill();
        } else {
            trace!("Waiting for {} to finish", com.display());
            loop {
                match child.try_wait() {
                    Ok(Some(st)) => {
                        if !st.success() {
                            err_com = Some(format!(
                                "Error from pipeline: {} exited with {}",
                                com.display(),
                                st
                            ));
                        }
                        break;
                    }
                    Ok(None) => {
                        if get_signal(sig.clone()) != 0 {
                            let _ = child.kill();
                        }
                        thread::sleep(delay);
                    }
                    Err(e) => {
                        err_com = Some(format!(
                            "Error from pipeline: {} exited with error {}",
                            com.display(),
                            e
                        ));
                        break;
                    }
                }
            }
        }
    }
    err_com
}

pub fn install_signal_handlers() -> Arc<AtomicUsize> {
    let sig = Arc::new(AtomicUsize::new(0));
    let _ = signal_hook::flag::register_usize(
        signal_hook::consts::SIGTERM,
        Arc::clone(&sig),
        SIGTERM,
    );
    let _ =
        signal_hook::flag::register_usize(signal_hook::consts::SIGINT, Arc::clone(&sig), SIGINT);
    let _ =
        signal_hook::flag::register_usize(signal_hook::consts::SIGQUIT, Arc::clone(&sig), SIGQUIT);
    let _ =
        signal_hook::flag::register_usize(signal_hook::consts::SIGHUP, Arc::clone(&sig), SIGHUP);
    sig
}

pub fn get_signal(sig: Arc<AtomicUsize>) -> usize {
    sig.load(Ordering::Relaxed)
}

pub fn check_signal(sig: Arc<AtomicUsize>) -> Result<(), String> {
    match get_signal(sig) {
        0 => Ok(()),
        s => Err(format!("Received {} signal.  Closing down", signal_msg(s))),
    }
}
