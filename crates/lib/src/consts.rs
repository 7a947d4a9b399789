/// Application name, used for data and cache directory names.
pub const APP_NAME: &str = "sussyos";

/// File name of the memory container inside the data directory.
pub const MEMORY_FILENAME: &str = "memory.zip";

/// Environment variable overriding the memory container path.
pub const MEMORY_PATH_ENV: &str = "SUSSYOS_MEMORY";

/// Line that ends interactive program input.
pub const PROGRAM_SENTINEL: &str = "OS_EXIT";
