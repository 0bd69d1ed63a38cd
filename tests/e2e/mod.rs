mod deletion;
mod errors;
mod expenses;
mod help;
mod search;
mod templates;
