pub mod formatter;

pub use formatter::{
    format_age, format_checklist, format_history_table, format_history_tsv, format_score_result,
    should_use_colors,
};
