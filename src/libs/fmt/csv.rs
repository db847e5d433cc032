use std::io::Write;

use crate::libs::matrix::RmsdMatrix;
use crate::libs::structures::Structure;

/// Write the matrix as CSV.
///
/// Header row is `structures,<name_0>,...,<name_{n-1}>`; each data row starts
/// with the structure name followed by n comma-separated cells. Only
/// strictly-lower-triangular cells carry a value (fixed-point, 6 decimals);
/// every other cell is an empty field, commas included.
pub fn write_csv<W: Write>(
    writer: &mut W,
    structures: &[Structure],
    mat: &RmsdMatrix,
) -> anyhow::Result<()> {
    write!(writer, "structures")?;
    for structure in structures {
        write!(writer, ",{}", structure.name)?;
    }
    writeln!(writer)?;

    for (i, structure) in structures.iter().enumerate() {
        write!(writer, "{}", structure.name)?;
        for j in 0..mat.size() {
            if i > j {
                write!(writer, ",{:.6}", mat.get(i, j))?;
            } else {
                write!(writer, ",")?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
