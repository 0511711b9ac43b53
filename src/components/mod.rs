pub mod account;
pub mod debounce;
pub mod family_tree;
pub mod layout;
pub mod person_form;
