use crate::libs::aligner::{Aligner, AlignerError};
use crate::libs::matrix::RmsdMatrix;
use crate::libs::structures::Structure;

/// Fill the lower triangle of the RMSD matrix by superposing every pair.
///
/// For each column `c`, the outer structure is loaded once and every row
/// structure `r > c` is loaded, aligned onto it and deleted again, so at most
/// two structures are resident in the aligner at any time. Warnings are
/// emitted in (c, r) traversal order.
///
/// A structure that fails to load is warned about and never retried; every
/// pair involving it keeps the sentinel. A pair whose alignment fails (e.g.
/// no matching alpha-carbon atoms) is likewise warned about and skipped, and
/// the mobile structure is still deleted. Only transport-level aligner
/// failures abort the run.
pub fn pairwise_rmsd(
    aligner: &mut dyn Aligner,
    structures: &[Structure],
) -> anyhow::Result<RmsdMatrix> {
    let n = structures.len();
    let mut mat = RmsdMatrix::new(n);

    for c in 0..n.saturating_sub(1) {
        let target = &structures[c];
        match aligner.load(&target.path, &target.name) {
            Ok(()) => {}
            Err(AlignerError::Load { .. }) => {
                warn_load(&target.path);
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        for r in (c + 1)..n {
            let mobile = &structures[r];
            match aligner.load(&mobile.path, &mobile.name) {
                Ok(()) => {}
                Err(AlignerError::Load { .. }) => {
                    warn_load(&mobile.path);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let aligned = aligner.align(&mobile.name, &target.name);
            // the mobile structure leaves the working context whether or not
            // the alignment succeeded
            aligner.delete(&mobile.name)?;

            match aligned {
                Ok(rmsd) => mat.set(r, c, rmsd),
                Err(AlignerError::Align { message, .. }) => {
                    eprintln!(
                        "Warning: can not align {} onto {} ({}). The RMSD value will be left at -1.0",
                        mobile.name, target.name, message
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        aligner.delete(&target.name)?;
    }

    Ok(mat)
}

fn warn_load(path: &str) {
    eprintln!(
        "Warning: can not load structure {}. Ignoring it. Corresponding RMSD values will be set to -1.0",
        path
    );
}
