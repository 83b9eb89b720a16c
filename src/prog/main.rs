use crate::prog::hir::*;
use crate::prog::sess::Sess;
use crate::ty::TyPool;

/// A fully analyzed program: the session it was read in, the type pool
/// shared by all passes, and the typed HIR.
pub struct Program {
    pub sess: Sess,
    pub tys: TyPool,
    pub hir: Rc<HProgram>,
}
