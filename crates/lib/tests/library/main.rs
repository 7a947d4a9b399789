mod archive_tests;
mod script_tests;
