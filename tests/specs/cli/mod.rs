mod help;
mod payload;
mod resume;
mod tasks;
