pub mod requests;

pub use requests::{ActionQuery, ActivationQuery, GetNumberQuery};
