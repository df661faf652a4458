// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
      _ _                              _             _
  ___| (_)_ __         _____   ____ _| |_   _  __ _| |_ ___
 / __| | | '_ \ _____ / _ \ \ / / _` | | | | |/ _` | __/ _ \
| (__| | | |_) |_____|  __/\ V / (_| | | |_| | (_| | ||  __/
 \___|_|_| .__/       \___| \_/ \__,_|_|\__,_|\__,_|\__\___|
         |_|

    Image-Text Similarity Evaluation API
"#;
    println!("{}", banner);
}
