use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use super::{Aligner, AlignerError};

lazy_static! {
    // "  Executive: RMSD =    0.977 (143 to 143 atoms)"
    static ref RE_RMSD: Regex = Regex::new(r"Executive: RMSD =\s+(\d+\.?\d*)").unwrap();
}

/// Drives a PyMOL subprocess (`pymol -cpq`) over stdin/stdout.
///
/// Each operation writes the corresponding PyMOL command followed by a
/// sentinel `print`, then reads stdout up to the sentinel. Load success is
/// confirmed by asking PyMOL whether the object actually appeared in its
/// working context; align results are scraped from the `Executive: RMSD =`
/// feedback line.
pub struct PymolAligner {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl PymolAligner {
    /// Start a PyMOL subprocess. `exe` overrides PATH lookup.
    pub fn spawn(exe: Option<&str>) -> Result<Self, AlignerError> {
        let exe: PathBuf = match exe {
            Some(path) => PathBuf::from(path),
            None => which::which("pymol").map_err(|e| {
                AlignerError::Protocol(format!("can not find the pymol executable: {}", e))
            })?,
        };

        let mut child = Command::new(&exe)
            .arg("-cpq")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                AlignerError::Protocol(format!("can not start {}: {}", exe.display(), e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AlignerError::Protocol("no stdin handle on pymol".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AlignerError::Protocol("no stdout handle on pymol".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn send(&mut self, line: &str) -> Result<(), AlignerError> {
        writeln!(self.stdin, "{}", line)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| AlignerError::Protocol(format!("can not write to pymol: {}", e)))
    }

    /// Read stdout up to the line containing `marker`, returning the lines
    /// that came before it and the marker line itself.
    fn read_until(&mut self, marker: &str) -> Result<(Vec<String>, String), AlignerError> {
        let mut lines = vec![];
        loop {
            let mut line = String::new();
            let n = self
                .stdout
                .read_line(&mut line)
                .map_err(|e| AlignerError::Protocol(format!("can not read from pymol: {}", e)))?;
            if n == 0 {
                return Err(AlignerError::Protocol(
                    "pymol exited unexpectedly".to_string(),
                ));
            }
            let line = line.trim_end().to_string();
            if line.contains(marker) {
                return Ok((lines, line));
            }
            lines.push(line);
        }
    }
}

impl Aligner for PymolAligner {
    fn load(&mut self, path: &str, name: &str) -> Result<(), AlignerError> {
        self.send(&format!("load {}, {}", path, name))?;
        // PyMOL's command loop swallows load errors, so ask whether the
        // object actually exists now
        self.send(&format!(
            "/print(\"RMSDMAT LOADED %d\" % int(\"{}\" in cmd.get_names()))",
            name
        ))?;

        let (_, reply) = self.read_until("RMSDMAT LOADED")?;
        if reply.ends_with('1') {
            Ok(())
        } else {
            Err(AlignerError::Load {
                path: path.to_string(),
                message: "pymol could not read the file".to_string(),
            })
        }
    }

    fn align(&mut self, mobile: &str, target: &str) -> Result<f64, AlignerError> {
        self.send(&format!(
            "align {} and name CA, {} and name CA",
            mobile, target
        ))?;
        self.send("/print(\"RMSDMAT DONE align\")")?;

        let (lines, _) = self.read_until("RMSDMAT DONE align")?;
        match parse_rmsd(&lines) {
            Some(rmsd) => Ok(rmsd),
            None => Err(AlignerError::Align {
                mobile: mobile.to_string(),
                target: target.to_string(),
                message: "pymol reported no RMSD".to_string(),
            }),
        }
    }

    fn delete(&mut self, name: &str) -> Result<(), AlignerError> {
        self.send(&format!("delete {}", name))?;
        self.send("/print(\"RMSDMAT DONE delete\")")?;
        self.read_until("RMSDMAT DONE delete")?;

        Ok(())
    }
}

impl Drop for PymolAligner {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        let _ = self.child.wait();
    }
}

fn parse_rmsd(lines: &[String]) -> Option<f64> {
    lines
        .iter()
        .find_map(|line| RE_RMSD.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}
