//! Canvas drawing and DOM overlay markup for the wheel.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Element};

use super::card::{QuestionCard, status_grid};
use super::geometry::{SegmentGeometry, WheelLayout, segment_style};
use super::{PhaseKind, Snapshot};
use crate::riddles::RiddleTable;

const NEON_CYAN: &str = "#06b6d4";
const NEON_PINK: &str = "#ec4899";
const WHEEL_BG: &str = "#020617";
pub(crate) const HUB_RADIUS: f64 = 30.0;

// --- Canvas -----------------------------------------------------------------

pub(crate) fn draw_wheel(
    ctx: &CanvasRenderingContext2d,
    layout: &WheelLayout,
    geometry: &[SegmentGeometry],
    snapshot: &Snapshot,
    rotation_deg: f64,
    width: f64,
    height: f64,
) -> Result<(), JsValue> {
    let (cx, cy, r) = (layout.center_x, layout.center_y, layout.radius);
    ctx.clear_rect(0.0, 0.0, width, height);

    // Outer glow ring
    let glow = ctx.create_radial_gradient(cx, cy, r * 0.9, cx, cy, r + 18.0)?;
    glow.add_color_stop(0.0, "rgba(6,182,212,0.25)")?;
    glow.add_color_stop(1.0, "rgba(6,182,212,0)")?;
    ctx.set_fill_style_canvas_gradient(&glow);
    ctx.begin_path();
    ctx.arc(cx, cy, r + 18.0, 0.0, TAU)?;
    ctx.fill();

    ctx.save();
    ctx.translate(cx, cy)?;
    ctx.rotate(rotation_deg.to_radians())?;
    ctx.translate(-cx, -cy)?;

    ctx.set_fill_style_str(WHEEL_BG);
    ctx.begin_path();
    ctx.arc(cx, cy, r, 0.0, TAU)?;
    ctx.fill();

    ctx.set_font("bold 24px Orbitron, sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for seg in geometry {
        let style = segment_style(snapshot, seg.id);
        ctx.begin_path();
        ctx.move_to(cx, cy);
        ctx.arc(cx, cy, r, seg.start_deg.to_radians(), seg.end_deg.to_radians())?;
        ctx.close_path();
        ctx.set_fill_style_str(style.fill());
        ctx.fill();
        ctx.set_stroke_style_str(NEON_CYAN);
        ctx.set_line_width(2.0);
        ctx.stroke();

        ctx.save();
        ctx.translate(seg.label.x, seg.label.y)?;
        ctx.rotate(seg.label.rotate_deg.to_radians())?;
        ctx.set_fill_style_str(style.label_color());
        ctx.fill_text(&seg.id.to_string(), 0.0, 0.0)?;
        ctx.restore();
    }

    // Hub
    ctx.begin_path();
    ctx.arc(cx, cy, HUB_RADIUS, 0.0, TAU)?;
    ctx.set_fill_style_str(WHEEL_BG);
    ctx.fill();
    ctx.set_stroke_style_str(NEON_CYAN);
    ctx.set_line_width(4.0);
    ctx.stroke();
    ctx.restore();

    // Spin button face stays upright over the hub.
    if snapshot.phase == PhaseKind::Idle {
        ctx.begin_path();
        ctx.arc(cx, cy, HUB_RADIUS - 4.0, 0.0, TAU)?;
        ctx.set_fill_style_str(NEON_CYAN);
        ctx.fill();
        ctx.set_font("bold 13px Orbitron, sans-serif");
        ctx.set_fill_style_str("#000000");
        ctx.fill_text("SPIN", cx, cy)?;
    }

    draw_pointer(ctx, cx, cy - r);
    Ok(())
}

/// Downward triangle whose tip touches the rim at the top of the wheel.
fn draw_pointer(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64) {
    ctx.begin_path();
    ctx.move_to(tip_x, tip_y + 8.0);
    ctx.line_to(tip_x - 15.0, tip_y - 22.0);
    ctx.line_to(tip_x + 15.0, tip_y - 22.0);
    ctx.close_path();
    ctx.set_fill_style_str(NEON_PINK);
    ctx.fill();
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(2.0);
    ctx.stroke();
}

// --- DOM overlays -----------------------------------------------------------

const BUTTON_CSS: &str = "flex:1; padding:12px 0; border:none; border-radius:4px; font-weight:bold; text-transform:uppercase; color:#fff; cursor:pointer;";

pub(crate) fn card_html(snapshot: &Snapshot, card: &QuestionCard, riddles: &RiddleTable) -> String {
    let Some(id) = snapshot.active else {
        return "<div style='height:12rem; border:2px solid #1e293b; border-radius:12px; display:flex; align-items:center; justify-content:center; color:#64748b; font-family:monospace; letter-spacing:0.2em;'>SYSTEM STANDBY...</div>".to_string();
    };
    let Some(riddle) = riddles.get(id) else {
        log::error!("active segment {} has no riddle", id);
        return String::new();
    };
    let answer = if card.revealed() {
        format!(
            "<span style='color:#f472b6; font-weight:bold;'>{}</span>",
            escape_html(&riddle.answer)
        )
    } else {
        "<button data-action='peek' style='background:none; border:none; color:#94a3b8; text-decoration:underline dotted; cursor:pointer; text-transform:uppercase; font-size:12px;'>Peek answer</button>".to_string()
    };
    format!(
        "<div style='border:2px solid {NEON_CYAN}; border-radius:12px; background:#0b1221; overflow:hidden;'>\
           <div style='padding:8px; text-align:center; color:#22d3ee; font-weight:bold; letter-spacing:0.2em; border-bottom:1px solid rgba(6,182,212,0.3);'>QUESTION #{id}</div>\
           <div style='padding:24px; text-align:center;'>\
             <p style='color:#fff; font-size:18px; font-weight:bold; margin:0 0 24px;'>\"{question}\"</p>\
             <div style='height:2rem; margin-bottom:24px;'>{answer}</div>\
             <div style='display:flex; gap:16px;'>\
               <button data-action='correct' style='{BUTTON_CSS} background:#16a34a;'>Correct</button>\
               <button data-action='incorrect' style='{BUTTON_CSS} background:#dc2626;'>Wrong</button>\
             </div>\
           </div>\
         </div>",
        question = escape_html(&riddle.question),
    )
}

pub(crate) fn banner_html(snapshot: &Snapshot) -> String {
    if snapshot.phase != PhaseKind::Complete {
        return String::new();
    }
    "<div style='text-align:center; background:rgba(30,41,59,0.9); padding:24px; border-radius:12px; border:1px solid #eab308;'>\
       <h2 style='color:#facc15; margin:0 0 16px;'>GAME COMPLETE</h2>\
       <button data-action='reset' style='padding:8px 24px; background:#eab308; color:#000; font-weight:bold; border:none; border-radius:4px; cursor:pointer;'>RESTART</button>\
     </div>"
        .to_string()
}

pub(crate) fn grid_html(snapshot: &Snapshot) -> String {
    let mut html = String::from(
        "<div style='display:flex; flex-wrap:wrap; justify-content:center; gap:8px; max-width:24rem; margin:0 auto;'>",
    );
    for (id, status) in status_grid(snapshot) {
        html.push_str(&format!(
            "<div style='width:2rem; height:2rem; display:flex; align-items:center; justify-content:center; border:1px solid; border-radius:4px; font-weight:bold; font-size:14px; {}'>{}</div>",
            status.css(),
            id
        ));
    }
    html.push_str("</div>");
    html
}

pub(crate) fn set_overlay(el: &Element, html: &str) {
    if el.inner_html() != html {
        el.set_inner_html(html);
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
