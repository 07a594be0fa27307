mod catalog;
mod dependencies;
mod errors;
mod inventory;
mod lending;
mod transaction;

pub use catalog::{
    list_loan_history, list_loans_for_borrower, list_open_loans_for_title, list_titles,
};
pub use dependencies::ServiceDependencies;
pub use errors::{ApplicationError, ErrorKind, Result};
pub use inventory::{create_title, get_title, update_quantity, update_title};
pub use lending::{borrow_title, return_title};
