use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_invalid() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.assert().failure();

    Ok(())
}

#[test]
fn command_version() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("rmsdmat"));

    Ok(())
}

#[test]
fn command_single_input() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("a.pdb");
    std::fs::write(&input, "ATOM\n")?;
    let base = temp.path().join("out");

    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.arg(&input)
        .arg("-o")
        .arg(&base)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "at least two distinct structure files are required",
        ));

    // no partial output files
    assert!(!temp.path().join("out.csv").exists());
    assert!(!temp.path().join("out.meg").exists());

    Ok(())
}

#[test]
fn command_duplicate_inputs() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let input = temp.path().join("a.pdb");
    std::fs::write(&input, "ATOM\n")?;

    // two copies of one path collapse to a single structure
    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.arg(&input)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "at least two distinct structure files are required",
        ));

    Ok(())
}

#[test]
fn command_name_collision() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    std::fs::create_dir(temp.path().join("dir1"))?;
    std::fs::create_dir(temp.path().join("dir2"))?;
    let input1 = temp.path().join("dir1").join("x.pdb");
    let input2 = temp.path().join("dir2").join("x.pdb");
    std::fs::write(&input1, "ATOM\n")?;
    std::fs::write(&input2, "ATOM\n")?;

    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.arg(&input1)
        .arg(&input2)
        .assert()
        .failure()
        .stderr(predicate::str::contains("display name"));

    Ok(())
}

// A minimal stand-in for `pymol -cpq` that speaks just enough of the stdin
// command protocol: loads succeed when the file exists, every alignment
// reports an RMSD of 1.500.
#[cfg(unix)]
const STUB_PYMOL: &str = r#"#!/bin/sh
ok=0
while IFS= read -r line; do
    case "$line" in
        "load "*)
            p="${line#load }"
            p="${p%%,*}"
            if [ -f "$p" ]; then ok=1; else ok=0; fi
            ;;
        *"RMSDMAT LOADED"*)
            echo "RMSDMAT LOADED $ok"
            ;;
        "align "*)
            echo " Executive: RMSD =    1.500 (3 to 3 atoms)"
            ;;
        *"RMSDMAT DONE align"*)
            echo "RMSDMAT DONE align"
            ;;
        *"RMSDMAT DONE delete"*)
            echo "RMSDMAT DONE delete"
            ;;
        quit)
            exit 0
            ;;
    esac
done
"#;

#[cfg(unix)]
fn write_stub_pymol(dir: &std::path::Path) -> anyhow::Result<std::path::PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("pymol");
    std::fs::write(&path, STUB_PYMOL)?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;

    Ok(path)
}

#[cfg(unix)]
#[test]
fn command_matrix() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let stub = write_stub_pymol(temp.path())?;

    for name in ["a.pdb", "b.pdb", "c.pdb"] {
        std::fs::write(temp.path().join(name), "ATOM\n")?;
    }
    let base = temp.path().join("out");

    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.arg(temp.path().join("c.pdb"))
        .arg(temp.path().join("a.pdb"))
        .arg(temp.path().join("b.pdb"))
        .arg("-o")
        .arg(&base)
        .arg("--pymol")
        .arg(&stub)
        .assert()
        .success();

    let csv = std::fs::read_to_string(temp.path().join("out.csv"))?;
    let expected = "\
structures,a,b,c
a,,,
b,1.500000,,
c,1.500000,1.500000,
";
    assert_eq!(csv, expected);

    let meg = std::fs::read_to_string(temp.path().join("out.meg"))?;
    assert!(meg.starts_with("#mega\n"));
    assert!(meg.contains("DataFormat=LowerLeft NTaxa=3;"));
    assert!(meg.contains("[1] #a\n[2] #b\n[3] #c\n"));
    assert!(meg.contains(&format!("[ 2]   {:>9}", "1.5")));

    Ok(())
}

#[cfg(unix)]
#[test]
fn command_matrix_idempotent() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let stub = write_stub_pymol(temp.path())?;

    for name in ["a.pdb", "b.pdb"] {
        std::fs::write(temp.path().join(name), "ATOM\n")?;
    }

    let mut outputs = vec![];
    for base in ["run1", "run2"] {
        let mut cmd = Command::cargo_bin("rmsdmat")?;
        cmd.arg(temp.path().join("a.pdb"))
            .arg(temp.path().join("b.pdb"))
            .arg("-o")
            .arg(temp.path().join(base))
            .arg("--pymol")
            .arg(&stub)
            .assert()
            .success();

        let csv = std::fs::read_to_string(temp.path().join(format!("{}.csv", base)))?;
        let meg = std::fs::read_to_string(temp.path().join(format!("{}.meg", base)))?;
        outputs.push((csv, meg));
    }

    assert_eq!(outputs[0], outputs[1]);

    Ok(())
}

#[cfg(unix)]
#[test]
fn command_load_failure() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let stub = write_stub_pymol(temp.path())?;

    for name in ["a.pdb", "c.pdb"] {
        std::fs::write(temp.path().join(name), "ATOM\n")?;
    }
    // b.pdb is never written, so the stub fails to load it
    let missing = temp.path().join("b.pdb");
    let base = temp.path().join("out");

    let mut cmd = Command::cargo_bin("rmsdmat")?;
    cmd.arg(temp.path().join("a.pdb"))
        .arg(&missing)
        .arg(temp.path().join("c.pdb"))
        .arg("-o")
        .arg(&base)
        .arg("--pymol")
        .arg(&stub)
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Warning: can not load structure")
                .and(predicate::str::contains("b.pdb")),
        );

    // every cell touching b keeps the placeholder, a-c is still computed
    let csv = std::fs::read_to_string(temp.path().join("out.csv"))?;
    let expected = "\
structures,a,b,c
a,,,
b,-1.000000,,
c,1.500000,-1.000000,
";
    assert_eq!(csv, expected);

    Ok(())
}
