//! `sampleview-render` turns samples and decoded payloads into a render tree.
//!
//! The tree ([`RenderNode`]) is display-agnostic; [`plain::Renderer`] flattens
//! it for terminals.

pub mod node;
pub mod plain;
pub mod reward;
pub mod sample;
pub mod text;
pub mod turn;
pub mod value;

pub use node::{RenderNode, Tone};
pub use plain::Renderer;
pub use reward::{compare_actions, db_actions, format_action, render_reward_explanation, ActionMatch, ActionRow};
pub use sample::{pass_marker, render_sample, render_status_line, render_summary, status_line, verdict, Verdict};
pub use text::{render_markup, render_segments, render_text};
pub use turn::{render_conversation, render_turn, TurnRenderer};
pub use value::{render_json_view, render_payload, render_value, render_value_tree, PayloadView};
