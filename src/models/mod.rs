pub mod cart;
pub mod payment;
pub mod product;

pub use cart::*;
pub use payment::*;
pub use product::*;
