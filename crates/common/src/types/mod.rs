use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    /// Active restaurant store backend (`memory` or `database`).
    pub backend: &'static str,
}
