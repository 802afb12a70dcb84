pub mod card_list;
pub mod controls;
pub mod header;
