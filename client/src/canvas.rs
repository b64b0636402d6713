use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, WheelEvent};

use cathar_shared::Site;

use crate::app::{ActiveSites, Hovered, InactiveSites, Store, canvas_dimensions};
use crate::colors::{ACTIVE_RGB, INACTIVE_RGB, rgba_css};
use crate::viewport::{Viewport, project};

const MARKER_RADIUS: f64 = 4.5;
const HOVER_RADIUS_PX: f64 = 10.0;

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0)
}

struct ResizeBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Marker canvas: plots the active/inactive site partition and turns
/// pan/zoom gestures into `move_map` commits on the store.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let Store(store) = expect_context();
    let ActiveSites(active) = expect_context();
    let InactiveSites(inactive) = expect_context();
    let Hovered(hovered) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let resize_tick: RwSignal<u32> = RwSignal::new(0);
    let viewport_ready = Rc::new(Cell::new(false));

    // Drag state
    let is_dragging = Rc::new(Cell::new(false));
    let last_x = Rc::new(Cell::new(0.0f64));
    let last_y = Rc::new(Cell::new(0.0f64));

    // Start from the store's viewport (default center over the Languedoc)
    // once the store exists.
    {
        let viewport_ready = viewport_ready.clone();
        Effect::new(move || {
            if viewport_ready.get() {
                return;
            }
            let Some(view) = store.with(|s| s.as_ref().map(|s| s.view())) else {
                return;
            };
            let (w, h) = canvas_dimensions();
            viewport.set(Viewport::from_view(&view, w, h));
            viewport_ready.set(true);
        });
    }

    // Redraw when the transform, the partition, or the window size changes.
    Effect::new(move || {
        resize_tick.track();
        let vp = viewport.get();
        let active_sites = active.get();
        let inactive_sites = inactive.get();
        let hovered_site = hovered.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        draw(
            &canvas,
            &vp,
            &active_sites,
            &inactive_sites,
            hovered_site.as_ref(),
        );
    });

    // Window resize invalidation.
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };
        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "resize",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler = Closure::<dyn Fn()>::new(move || {
            resize_tick.update(|t| *t = t.wrapping_add(1));
        });
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    // Push the interaction result back into the store; center, zoom, and
    // extent always travel together.
    let commit_view = move || {
        let (w, h) = canvas_dimensions();
        let view = viewport.get_untracked().to_view(w, h);
        store.update(|s| {
            if let Some(s) = s {
                s.move_map(view.center, view.zoom, view.extent);
            }
        });
    };

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(delta, x, y));
        commit_view();
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            hovered.set(None);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            if is_dragging.get() {
                let dx = e.client_x() as f64 - last_x.get();
                let dy = e.client_y() as f64 - last_y.get();
                last_x.set(e.client_x() as f64);
                last_y.set(e.client_y() as f64);
                viewport.update(|vp| vp.pan(dx, dy));
            } else {
                let vp = viewport.get_untracked();
                let sx = e.offset_x() as f64;
                let sy = e.offset_y() as f64;
                let hit = hit_test(
                    &vp,
                    sx,
                    sy,
                    &active.get_untracked(),
                    &inactive.get_untracked(),
                );
                if hit != hovered.get_untracked() {
                    hovered.set(hit);
                }
            }
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |e: PointerEvent| {
            if is_dragging.get() {
                is_dragging.set(false);
                commit_view();
            }

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    let on_pointer_leave = move |_: PointerEvent| {
        if hovered.get_untracked().is_some() {
            hovered.set(None);
        }
    };

    view! {
        <div
            style="position: relative; width: 100%; height: 100%; overflow: hidden;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
        >
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab;"
            />
        </div>
    }
}

/// Nearest marker within the hover radius, active sites taking precedence.
/// Returns the record itself so the label never has to look a site up by
/// name again.
fn hit_test(vp: &Viewport, sx: f64, sy: f64, active: &[Site], inactive: &[Site]) -> Option<Site> {
    let mut best: Option<(f64, &Site)> = None;
    for site in active.iter().chain(inactive.iter()) {
        let Some(geo) = site.geo else {
            continue;
        };
        let (wx, wy) = project(geo.lat, geo.lon);
        let (mx, my) = vp.world_to_screen(wx, wy);
        let dist = ((mx - sx).powi(2) + (my - sy).powi(2)).sqrt();
        if dist <= HOVER_RADIUS_PX && best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, site));
        }
    }
    best.map(|(_, site)| site.clone())
}

fn draw(
    canvas: &HtmlCanvasElement,
    vp: &Viewport,
    active: &[Site],
    inactive: &[Site],
    hovered: Option<&Site>,
) {
    let (css_w, css_h) = canvas_dimensions();
    let dpr = device_pixel_ratio();
    let px_w = (css_w * dpr) as u32;
    let px_h = (css_h * dpr) as u32;
    if canvas.width() != px_w {
        canvas.set_width(px_w);
    }
    if canvas.height() != px_h {
        canvas.set_height(px_h);
    }

    let Ok(Some(ctx_obj)) = canvas.get_context("2d") else {
        return;
    };
    let Ok(ctx) = ctx_obj.dyn_into::<CanvasRenderingContext2d>() else {
        return;
    };

    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
    ctx.clear_rect(0.0, 0.0, css_w, css_h);
    ctx.set_fill_style_str("#0c0e17");
    ctx.fill_rect(0.0, 0.0, css_w, css_h);

    // Inactive markers first so active ones always sit on top.
    let (ir, ig, ib) = INACTIVE_RGB;
    for site in inactive {
        draw_marker(&ctx, vp, site, &rgba_css(ir, ig, ib, 0.45), MARKER_RADIUS * 0.8);
    }
    let (ar, ag, ab) = ACTIVE_RGB;
    for site in active {
        draw_marker(&ctx, vp, site, &rgba_css(ar, ag, ab, 0.9), MARKER_RADIUS);
    }

    if let Some(site) = hovered
        && let Some(geo) = site.geo
    {
        let (wx, wy) = project(geo.lat, geo.lon);
        let (sx, sy) = vp.world_to_screen(wx, wy);
        let label = match &site.place {
            Some(place) => format!("{} \u{2014} {}", site.name, place),
            None => site.name.clone(),
        };
        ctx.set_font("12px 'JetBrains Mono', monospace");
        ctx.set_line_width(3.0);
        ctx.set_stroke_style_str("rgba(8, 10, 18, 0.92)");
        ctx.stroke_text(&label, sx + 10.0, sy - 8.0).ok();
        ctx.set_fill_style_str("rgba(220, 218, 210, 0.92)");
        ctx.fill_text(&label, sx + 10.0, sy - 8.0).ok();
    }
}

fn draw_marker(ctx: &CanvasRenderingContext2d, vp: &Viewport, site: &Site, css: &str, radius: f64) {
    let Some(geo) = site.geo else {
        return;
    };
    let (wx, wy) = project(geo.lat, geo.lon);
    let (sx, sy) = vp.world_to_screen(wx, wy);

    ctx.begin_path();
    ctx.arc(sx, sy, radius, 0.0, std::f64::consts::TAU).ok();
    ctx.set_fill_style_str(css);
    ctx.fill();
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str("rgba(8, 10, 18, 0.8)");
    ctx.stroke();
}

#[cfg(test)]
mod tests {
    use super::hit_test;
    use crate::viewport::{Viewport, project};
    use cathar_shared::{GeoPoint, Site};

    fn site(name: &str, place: &str, lat: f64, lon: f64) -> Site {
        Site {
            name: name.into(),
            place: Some(place.into()),
            geo: Some(GeoPoint { lat, lon }),
            no_data: false,
            until_1209: true,
            p1210_1219: false,
            p1220_1229: false,
            p1230_1244: false,
        }
    }

    // With the identity transform, marker screen positions equal their
    // projected world coordinates.
    fn screen_of(s: &Site) -> (f64, f64) {
        let geo = s.geo.unwrap();
        project(geo.lat, geo.lon)
    }

    #[test]
    fn picks_the_marker_under_the_cursor() {
        let vp = Viewport::default();
        let a = site("Minerve", "Minerve", 43.3551, 2.7465);
        let b = site("Termes", "Termes", 43.0008, 2.5599);
        let (sx, sy) = screen_of(&b);

        let hit = hit_test(&vp, sx, sy, &[a], &[b.clone()]);
        assert_eq!(hit, Some(b));
    }

    #[test]
    fn misses_outside_the_hover_radius() {
        let vp = Viewport::default();
        let a = site("Minerve", "Minerve", 43.3551, 2.7465);
        let (sx, sy) = screen_of(&a);

        assert_eq!(hit_test(&vp, sx + 200.0, sy, &[a], &[]), None);
    }

    #[test]
    fn same_named_sites_resolve_by_position() {
        let vp = Viewport::default();
        // Two distinct records sharing a name; hovering one must yield
        // that record, not its namesake.
        let upper = site("Saint-Martin", "Aude", 43.4, 2.2);
        let lower = site("Saint-Martin", "Ariège", 42.9, 1.8);
        let (sx, sy) = screen_of(&lower);

        let hit = hit_test(&vp, sx, sy, &[upper, lower.clone()], &[]);
        assert_eq!(hit.as_ref().and_then(|s| s.place.as_deref()), Some("Ariège"));
        assert_eq!(hit, Some(lower));
    }
}
