//! Plain-text tables for terminal output.

use colored::Colorize;
use shelfwise_core::{Product, Shelf, User};
use shelfwise_normalize::{DashboardSummary, Normalized, PositionGroup, RecentPlacement, UserShelf};
use shelfwise_slotting::GridEvaluation;

/// Render rows under a bold header, padding every column to its widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");

    let mut out = format!("{}\n", header.trim_end().bold());
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn heading(title: &str) -> String {
    format!("{}\n", title.cyan().bold())
}

pub fn summary(summary: &DashboardSummary) -> String {
    format!(
        "{}users: {}  products: {}  placements: {}  occupied positions: {}\n",
        heading("Summary"),
        summary.total_users,
        summary.total_products,
        summary.total_placements,
        summary.occupied_positions
    )
}

pub fn by_position(groups: &[PositionGroup]) -> String {
    let rows: Vec<Vec<String>> = groups
        .iter()
        .flat_map(|g| {
            g.products.iter().map(move |p| {
                vec![
                    g.position.clone(),
                    p.product_name.clone(),
                    p.user_name.clone(),
                    p.placed_date.clone(),
                ]
            })
        })
        .collect();
    heading("By position") + &table(&["POSITION", "PRODUCT", "USER", "PLACED"], &rows)
}

pub fn by_user(shelves: &[UserShelf]) -> String {
    let mut out = heading("By user");
    for shelf in shelves {
        out.push_str(&format!("{} <{}>\n", shelf.user_name.bold(), shelf.user_email));
        for position in &shelf.positions {
            let names: Vec<&str> = position
                .products
                .iter()
                .map(|p| p.product_name.as_str())
                .collect();
            out.push_str(&format!("  {:<4} {}\n", position.position, names.join(", ")));
        }
    }
    out
}

pub fn recent(placements: &[RecentPlacement]) -> String {
    let rows: Vec<Vec<String>> = placements
        .iter()
        .map(|p| {
            vec![
                p.placed_date.clone(),
                p.position.clone(),
                p.product_name.clone(),
                p.user_name.clone(),
            ]
        })
        .collect();
    heading("Recent placements") + &table(&["PLACED", "POSITION", "PRODUCT", "USER"], &rows)
}

pub fn normalized(out: &Normalized, recent_placements: &[RecentPlacement]) -> String {
    let mut text = summary(&out.summary());
    for warning in &out.warnings {
        text.push_str(&format!("{} {warning}\n", "warning:".yellow().bold()));
    }
    text.push('\n');
    text.push_str(&by_position(&out.by_position));
    text.push('\n');
    text.push_str(&by_user(&out.by_user));
    if !recent_placements.is_empty() {
        text.push('\n');
        text.push_str(&recent(recent_placements));
    }
    text
}

pub fn products(products: &[&Product]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.category.clone(),
                format!("{:.2}", p.price),
                format!("{:.2}", p.margin),
                p.demand.clone(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "CATEGORY", "PRICE", "MARGIN", "DEMAND"], &rows)
}

pub fn users(users: &[User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| vec![u.email.clone(), u.name.clone(), u.status.clone()])
        .collect();
    table(&["EMAIL", "NAME", "STATUS"], &rows)
}

pub fn shelves(shelves: &[Shelf]) -> String {
    let rows: Vec<Vec<String>> = shelves
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                format!("{}x{}", s.rows, s.cols),
                s.products.len().to_string(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "GRID", "PLACED"], &rows)
}

pub fn shelf(shelf: &Shelf) -> String {
    let rows: Vec<Vec<String>> = shelf
        .products
        .iter()
        .map(|p| vec![p.position.clone(), p.product_id.clone()])
        .collect();
    format!(
        "{} ({}x{}, created {})\n{}",
        shelf.name.bold(),
        shelf.rows,
        shelf.cols,
        shelf.created_at,
        table(&["POSITION", "PRODUCT"], &rows)
    )
}

/// Grid of profits, the best cell marked with `*`.
pub fn evaluation(eval: &GridEvaluation, top: usize) -> String {
    let cols = eval.slots.iter().map(|s| s.col + 1).max().unwrap_or(0);
    let mut out = heading("Profit per slot");

    for row in eval.slots.chunks(cols.max(1)) {
        let cells: Vec<String> = row
            .iter()
            .map(|s| {
                let mark = if eval.best == Some(s.index) { "*" } else { " " };
                format!("{:>4} {:>10.2}{mark}", s.position, s.profit)
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }

    match eval.best_slot() {
        Some(best) => out.push_str(&format!(
            "\n{} {} (fee {:.2}, profit {:.2})\n",
            "Best slot:".green().bold(),
            best.position,
            best.fee,
            best.profit
        )),
        None => out.push_str(&format!("\n{}\n", "No profitable slot".red().bold())),
    }

    if top > 0 {
        let rows: Vec<Vec<String>> = eval
            .top_slots(top)
            .iter()
            .map(|s| {
                vec![
                    s.position.clone(),
                    format!("{:.2}", s.fee),
                    format!("{:.2}", s.profit),
                ]
            })
            .collect();
        out.push('\n');
        out.push_str(&table(&["POSITION", "FEE", "PROFIT"], &rows));
    }
    out
}
