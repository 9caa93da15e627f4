//! Transaction records: the domain types, their storage and the endpoints for changing them.

mod category;
mod clear_endpoint;
mod create_endpoint;
mod date;
mod db;
mod delete_endpoint;
mod domain;
mod form;
mod replace_endpoint;

pub use category::Category;
pub use clear_endpoint::clear_all_endpoint;
pub use create_endpoint::{
    EVENT_SELECT_ID, TRANSACTION_FORM_ID, category_options, create_transaction_endpoint,
    event_options, transaction_form_view,
};
pub use date::{DateKey, RecordDate};
pub use db::{
    create_record_table, delete_all_records, delete_record, get_all_records, insert_record,
    replace_record,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use domain::{NewTransaction, TransactionRecord};
pub use form::{TransactionForm, parse_amount};
pub use replace_endpoint::replace_transaction_endpoint;
