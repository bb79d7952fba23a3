mod formatter;

pub use formatter::{
    describe_event, format_event_list, format_mark, format_mark_detail, format_tsv,
    should_use_colors,
};
