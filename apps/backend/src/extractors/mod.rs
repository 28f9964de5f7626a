pub mod current_principal;

pub use current_principal::CurrentPrincipal;
