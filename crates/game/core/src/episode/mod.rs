//! Episode scripts and the stage cursor that walks them.
mod director;
mod reaction;
mod script;

pub use director::{DirectorError, StageDirector, StageView};
pub use reaction::{ReactionSpec, ReactionVerdict, judge_reaction};
pub use script::{
    Difficulty, EnemySpecialTemplate, EnemyTemplate, EpisodeScript, Presentation, Stage, StageKind,
};
