use std::env;
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub mod log_level;

fn executable(p: &Path) -> bool {
    match CString::new(p.as_os_str().as_bytes()) {
        Ok(cstr) => unsafe { libc::access(cstr.as_ptr(), libc::X_OK) == 0 },
        Err(_) => false,
    }
}

/// Search PATH for a program, returning the first entry that exists and
/// has execute permission.
pub fn find_exec_path<S: AsRef<OsStr>>(prog: S) -> Option<PathBuf> {
    let search_path =
        env::var_os("PATH").unwrap_or_else(|| OsString::from("/usr/bin:/usr/local/bin"));
    env::split_paths(&search_path)
        .map(|dir| dir.join(prog.as_ref()))
        .find(|candidate| candidate.exists() && executable(candidate))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_shell_on_path() {
        assert!(find_exec_path("sh").is_some());
    }

    #[test]
    fn misses_unknown_program() {
        assert!(find_exec_path("no_such_program_xyzzy").is_none());
    }
}
