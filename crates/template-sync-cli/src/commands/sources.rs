use crate::config::AppConfig;

pub fn run(config: &AppConfig) {
    if config.sources.is_empty() {
        println!("No sources configured.");
        return;
    }

    let label_width = config
        .sources
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);

    for entry in &config.sources {
        let state = if entry.enabled { "" } else { "  (disabled)" };
        println!(
            "  {:<label_width$}  {}{state}",
            entry.label,
            entry.source_type.describe(),
        );
    }
}
