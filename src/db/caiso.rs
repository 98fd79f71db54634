pub mod lib_caiso;
pub mod renewables_archive;
pub mod renewables_report;
