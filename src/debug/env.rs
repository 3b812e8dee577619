const ROOT_PREFIX: &str = "CDT2D";

pub(crate) mod svg {
    use std::{env, path};

    use crate::debug;

    const GROUP_PREFIX: &str = "SVG";

    fn var(key: &str) -> Option<String> {
        env::var(format!("{}_{}_{}", super::ROOT_PREFIX, GROUP_PREFIX, key)).ok()
    }

    pub(crate) fn output_path() -> Option<path::PathBuf> {
        var("OUTPUT_PATH").map(path::PathBuf::from)
    }

    pub(crate) fn show_labels() -> bool {
        // Note the show/hide inversion
        var("HIDE_LABELS").is_none()
    }

    pub(crate) fn output_level() -> debug::svg::SvgOutputLevel {
        use debug::svg::SvgOutputLevel;

        match var("OUTPUT_LEVEL").as_deref().map(str::trim) {
            Some("3") => SvgOutputLevel::AllSteps,
            Some("2") => SvgOutputLevel::MajorSteps,
            Some("1") => SvgOutputLevel::ResultOnly,
            _ => SvgOutputLevel::None,
        }
    }
}
