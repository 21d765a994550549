use leptos::prelude::*;

use super::dashboard::{ConflictRow, DayView, GroundView};

const STYLE: &str = include_str!("../style.css");

pub(super) fn render_page(
    window: &str,
    days: &[DayView],
    conflicts: &[ConflictRow],
    can_undo: bool,
) -> String {
    let schedule_html = render_schedule(days);
    let conflicts_html = render_conflicts(conflicts);
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let window = format!("Timeline: {window}");
    let undo_status = if can_undo {
        "A removed slot can be restored (POST /api/slots/undo)."
    } else {
        "Nothing to undo."
    };

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>"Sports Planner"</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <h1>"Sports Planner"</h1>
                <p class="timestamp">"Updated: " {now}</p>
                <p class="window">{window}</p>
                <p class="undo-status">{undo_status}</p>
                <section>
                    <h2>"Schedule Conflicts"</h2>
                    <div inner_html=conflicts_html />
                </section>
                <section>
                    <h2>"Game Slots"</h2>
                    <div inner_html=schedule_html />
                </section>
            </body>
        </html>
    }
    .to_html()
}

fn render_schedule(days: &[DayView]) -> String {
    if days.is_empty() {
        return view! { <p class="empty">"No slots scheduled."</p> }.to_html();
    }

    days.iter()
        .map(|d| {
            let title = format!("Day {}", d.day);
            let grounds_html: String = d.grounds.iter().map(render_ground).collect();
            view! {
                <div class="day">
                    <h3>{title}</h3>
                    <div inner_html=grounds_html />
                </div>
            }
            .to_html()
        })
        .collect()
}

fn render_ground(ground: &GroundView) -> String {
    let title = format!("Ground {}", ground.ground);
    let rows_html: String = ground
        .slots
        .iter()
        .map(|s| {
            let time = format!("{} - {}", s.start, s.end);
            let sport = s.sport.clone();
            let participants = s.participants.clone();
            let id = s.id.clone();
            let (css, flag) = if s.clash {
                ("overlap", "Conflict!")
            } else {
                ("", "")
            };

            view! {
                <tr class=css>
                    <td>{time}</td>
                    <td>{sport}</td>
                    <td>{participants}</td>
                    <td class="flag">{flag}</td>
                    <td class="slot-id">{id}</td>
                </tr>
            }
            .to_html()
        })
        .collect();

    view! {
        <h4>{title}</h4>
        <table>
            <thead>
                <tr>
                    <th>"Time"</th>
                    <th>"Sport"</th>
                    <th>"Participants"</th>
                    <th></th>
                    <th>"Id"</th>
                </tr>
            </thead>
            <tbody inner_html=rows_html />
        </table>
    }
    .to_html()
}

fn render_conflicts(conflicts: &[ConflictRow]) -> String {
    if conflicts.is_empty() {
        return view! { <p class="empty">"No conflicts found."</p> }.to_html();
    }

    let items_html: String = conflicts
        .iter()
        .map(|c| {
            let headline = format!(
                "Player {} has overlapping games on Day {}:",
                c.player, c.day
            );
            let slot_a = c.slot_a.clone();
            let slot_b = c.slot_b.clone();
            view! {
                <li>
                    {headline}
                    <ul>
                        <li>{slot_a}</li>
                        <li>{slot_b}</li>
                    </ul>
                </li>
            }
            .to_html()
        })
        .collect();

    view! { <ul class="conflicts" inner_html=items_html /> }.to_html()
}
