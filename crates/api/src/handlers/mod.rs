pub mod dialplan;
