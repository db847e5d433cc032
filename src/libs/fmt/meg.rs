use std::io::Write;

use crate::libs::matrix::RmsdMatrix;
use crate::libs::structures::Structure;

const CELL_WIDTH: usize = 9;

/// Write the matrix as a MEGA-compatible lower-left distance matrix.
///
/// Layout is part of the contract: the fixed header block, a 1-indexed taxa
/// list, a column-index line, then one row per structure with cells
/// right-justified in width-9 fields at 3 significant digits and blank
/// padding for the diagonal and upper triangle.
pub fn write_meg<W: Write>(
    writer: &mut W,
    structures: &[Structure],
    mat: &RmsdMatrix,
) -> anyhow::Result<()> {
    writeln!(writer, "#mega")?;
    writeln!(writer, "!Title: RMSD matrix;")?;
    writeln!(
        writer,
        "!Format DataType=Distance DataFormat=LowerLeft NTaxa={};",
        structures.len()
    )?;
    writeln!(writer, "!Description")?;
    writeln!(writer, "\tRMSD between structures calculated with rmsdmat")?;
    writeln!(writer, ";")?;
    writeln!(writer)?;

    for (i, structure) in structures.iter().enumerate() {
        writeln!(writer, "[{}] #{}", i + 1, structure.name)?;
    }

    write!(writer, "\n[     ")?;
    for i in 0..structures.len() {
        write!(writer, "{:9}", i + 1)?;
    }
    writeln!(writer, "  ]")?;

    for i in 0..mat.size() {
        write!(writer, "[{:2}]   ", i + 1)?;
        for j in 0..mat.size() {
            if i > j {
                write!(writer, "{:>9}", format_sig(mat.get(i, j), 3))?;
            } else {
                write!(writer, "{:width$}", "", width = CELL_WIDTH)?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Render `x` with `sig` significant digits, trailing zeros stripped,
/// switching to scientific notation with a two-digit exponent outside
/// `[1e-4, 10^sig)`.
fn format_sig(x: f64, sig: i32) -> String {
    if x == 0.0 {
        return "0".to_string();
    }

    let exp = x.abs().log10().floor() as i32;
    if (-4..sig).contains(&exp) {
        let decimals = (sig - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, x);

        // rounding can bump the exponent (999.9 -> 1000)
        let rounded: f64 = fixed.parse().unwrap_or(x);
        let exp2 = rounded.abs().log10().floor() as i32;
        if exp2 == exp {
            return trim_zeros(&fixed);
        }
        if (-4..sig).contains(&exp2) {
            let decimals = (sig - 1 - exp2).max(0) as usize;
            return trim_zeros(&format!("{:.*}", decimals, x));
        }
    }

    let sci = format!("{:.*e}", (sig - 1) as usize, x);
    let (mantissa, e) = sci.split_once('e').unwrap();
    let exp_val: i32 = e.parse().unwrap();
    format!(
        "{}e{}{:02}",
        trim_zeros(mantissa),
        if exp_val < 0 { '-' } else { '+' },
        exp_val.abs()
    )
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
