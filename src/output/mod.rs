pub mod formatter;

pub use formatter::{
    format_health_detail, format_health_table, format_score, format_tiers, format_tsv,
    should_use_colors, ScoredTransaction,
};
