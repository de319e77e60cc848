#![no_std]

pub mod images;
pub mod status;
