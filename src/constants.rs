pub const SCALE_STEPS: [ScaleStep; 4] = [
    ScaleStep {
        max_total: 10_000,
        scale: 1,
    },
    ScaleStep {
        max_total: 100_000,
        scale: 10,
    },
    ScaleStep {
        max_total: 1_000_000,
        scale: 100,
    },
    ScaleStep {
        max_total: 10_000_000,
        scale: 1_000,
    },
];

pub const GRID_SETTINGS: GridSettings = GridSettings {
    max_scale: 10_000,
    aggregate_rescale_threshold: 10_000,
    undo_capacity: 1,
    colored_glyph: '█',
    blank_glyph: '·',
};

pub const DEADLINE_SETTINGS: DeadlineSettings = DeadlineSettings { soon_days: 3 };

pub const FILE_NAMES: FileNames = FileNames {
    projects_dir: "projects",
    calendar_events: "calendar_events.json",
    project_extension: "json",
    image_extension: "img",
    backups_dir: "backups",
    max_backups: 10,
};

pub const DATA_DIR_ENV: &str = "GOALGRID_DATA_DIR";
pub const LOG_ENV: &str = "GOALGRID_LOG";

pub struct ScaleStep {
    pub max_total: u64,
    pub scale: u64,
}

pub struct GridSettings {
    pub max_scale: u64,
    pub aggregate_rescale_threshold: u64,
    pub undo_capacity: usize,
    pub colored_glyph: char,
    pub blank_glyph: char,
}

pub struct DeadlineSettings {
    pub soon_days: i64,
}

pub struct FileNames {
    pub projects_dir: &'static str,
    pub calendar_events: &'static str,
    pub project_extension: &'static str,
    pub image_extension: &'static str,
    pub backups_dir: &'static str,
    pub max_backups: usize,
}
