extern crate clap;
use clap::*;

use std::fs::File;
use std::io::{BufWriter, Write};

use rmsdmat::libs::aligner::PymolAligner;
use rmsdmat::libs::fmt::{csv, meg};
use rmsdmat::libs::pairwise::pairwise_rmsd;
use rmsdmat::libs::structures::unique_structures;

fn main() -> anyhow::Result<()> {
    let mut app = make_command();
    let args = app.clone().get_matches();

    execute(&args, &mut app)
}

// Create clap command arguments
fn make_command() -> Command {
    Command::new("rmsdmat")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Superimpose sets of protein structures and report an RMSD matrix, in CSV and MEGA-compatible formats")
        .color(ColorChoice::Auto)
        .disable_version_flag(true)
        .after_help(
            r###"
Every pair of distinct input structures is superposed on alpha-carbon atoms
(`name CA`) by an external PyMOL process, and the resulting RMSD values are
written as a lower-triangular matrix to <base>.csv and <base>.meg (MEGA
distance-matrix format).

Notes:
* Requires a `pymol` executable on PATH, or pass --pymol.
* Inputs are deduplicated and sorted; the sorted order drives row/column order.
* A structure pymol can not read is skipped with a warning; its matrix cells
  keep the placeholder value -1.0.
* Two different paths reducing to the same display name (e.g. a/1crn.pdb and
  b/1crn.pdb) would collide inside pymol and are rejected.

Examples:
1. Three structures, default output base:
   rmsdmat 1crn.pdb 1ubq.pdb 4hhb.pdb

2. Custom output base and pymol location:
   rmsdmat models/*.pdb -o models_rmsd --pymol /opt/pymol/bin/pymol

"###,
        )
        .arg(
            Arg::new("structures")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Structure files, in any format pymol can load"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .num_args(1)
                .default_value("rmsd_matrix")
                .help("Output files base name"),
        )
        .arg(
            Arg::new("pymol")
                .long("pymol")
                .num_args(1)
                .help("Path to the pymol executable [default: found on PATH]"),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
}

// command implementation
fn execute(args: &ArgMatches, app: &mut Command) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let paths: Vec<String> = args
        .get_many::<String>("structures")
        .unwrap()
        .cloned()
        .collect();
    let opt_output = args.get_one::<String>("output").unwrap();
    let opt_pymol = args.get_one::<String>("pymol").map(|s| s.as_str());

    let structures = unique_structures(&paths)?;
    if structures.len() < 2 {
        app.error(
            error::ErrorKind::TooFewValues,
            "at least two distinct structure files are required",
        )
        .exit();
    }

    //----------------------------
    // Pairwise RMSD
    //----------------------------
    let mut aligner = PymolAligner::spawn(opt_pymol)?;
    let mat = pairwise_rmsd(&mut aligner, &structures)?;

    //----------------------------
    // Output
    //----------------------------
    let mut csv_writer = BufWriter::new(File::create(format!("{}.csv", opt_output))?);
    csv::write_csv(&mut csv_writer, &structures, &mat)?;
    csv_writer.flush()?;

    let mut meg_writer = BufWriter::new(File::create(format!("{}.meg", opt_output))?);
    meg::write_meg(&mut meg_writer, &structures, &mat)?;
    meg_writer.flush()?;

    Ok(())
}
