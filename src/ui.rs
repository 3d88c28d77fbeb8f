// HUD status line - explode mode, full-explode phase, exploded part and the last hinge request
use bevy::prelude::*;

use crate::explode::{ExplodeAssembly, FullExplodePhase};
use crate::types::*;

pub fn hud_status(
    mode: &ExplodeMode,
    phase: Option<&str>,
    exploded_part: Option<&str>,
    last_hinge: Option<&str>,
) -> String {
    let mode = if mode.active { "Explode parts" } else { "Hinges" };
    let mut status = format!("Mode: {} | Full explode: {}", mode, phase.unwrap_or("No vehicle"));
    if let Some(name) = exploded_part {
        status.push_str(&format!(" | Part: {}", name));
    }
    if let Some(name) = last_hinge {
        status.push_str(&format!(" | Hinge: {}", name));
    }
    status
}

fn phase_text(phase: &FullExplodePhase, fraction: Option<f32>) -> String {
    match fraction {
        Some(fraction) => format!("{} {:.0}%", phase.label(), fraction * 100.0),
        None => phase.label().to_string(),
    }
}

pub fn update_hud(
    mode: Res<ExplodeMode>,
    mut hinge_requests: EventReader<HingeToggleRequested>,
    mut last_hinge: Local<Option<String>>,
    assemblies: Query<&ExplodeAssembly>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    // No hinge animator here, the HUD just shows what would be toggled
    if let Some(request) = hinge_requests.read().last() {
        info!("🔧 Hinge toggle requested: {}", request.name);
        *last_hinge = Some(request.name.clone());
    }

    let Ok(mut text) = hud_query.single_mut() else { return };

    let phase = assemblies
        .iter()
        .find_map(|assembly| assembly.full.as_ref())
        .map(|full| phase_text(full.phase(), full.fraction()));
    let exploded_part = assemblies.iter().find_map(|assembly| {
        let part = assembly.single.as_ref()?.active_part()?;
        assembly.registry.part(part).map(|p| p.name.clone())
    });

    let status = hud_status(&mode, phase.as_deref(), exploded_part.as_deref(), last_hinge.as_deref());
    if text.0 != status {
        text.0 = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_without_vehicle() {
        let status = hud_status(&ExplodeMode { active: false }, None, None, None);
        assert_eq!(status, "Mode: Hinges | Full explode: No vehicle");
    }

    #[test]
    fn status_shows_part_and_hinge() {
        let status = hud_status(&ExplodeMode { active: true }, Some("collapsed"), Some("Hood_Hinge"), Some("Trunk_Hinge"));
        assert_eq!(
            status,
            "Mode: Explode parts | Full explode: collapsed | Part: Hood_Hinge | Hinge: Trunk_Hinge"
        );
    }

    #[test]
    fn phase_text_shows_progress_while_animating() {
        assert_eq!(phase_text(&FullExplodePhase::Exploded, None), "exploded");
        assert_eq!(phase_text(&FullExplodePhase::Collapsed, Some(0.4)), "collapsed 40%");
    }
}
