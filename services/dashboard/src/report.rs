//! Console rendering of zones, filters and statistics.

use atlas_common::{
    format_volume, Evolution, EvolutionSelection, FeatureCollection, GlobalStats, SearchResult,
    Sector, SectorFamily, Theme, User, ZoneReport, ZoneStatDetail,
};
use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use drilldown::{Breadcrumb, MapView};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);
    table
}

/// `Cameroun › Centre › [Mfoundi]`, with history indexes for `jump`.
pub fn format_breadcrumbs(crumbs: &[Breadcrumb]) -> String {
    crumbs
        .iter()
        .map(|c| match c.index {
            Some(i) => format!("{} ({})", c.name, i),
            None => format!("[{}]", c.name),
        })
        .collect::<Vec<_>>()
        .join(" › ")
}

/// Zones as listed by `atlas zones`: id, name, level and parent.
pub fn format_zones(zones: &FeatureCollection) -> String {
    if zones.is_empty() {
        return "Aucune zone".to_string();
    }
    let mut table = table(vec!["ID", "Nom", "Niveau", "Parent"]);
    for feature in &zones.features {
        let props = &feature.properties;
        table.add_row(vec![
            props.id.to_string(),
            props.name.clone(),
            props.level.to_string(),
            props.parent_id.map(|p| p.to_string()).unwrap_or_default(),
        ]);
    }
    table.to_string()
}

/// The map as currently shown by the dashboard, with styles and tooltips.
pub fn format_map(view: &MapView, theme: Theme) -> String {
    let styled = view.styled_zones(theme);
    let title = format!(
        "{} · {} ({})",
        format_breadcrumbs(&view.breadcrumbs()),
        view.scope_label(),
        styled.len()
    );
    if styled.is_empty() {
        return format!("{}\nAucune zone", title);
    }
    let title = match view.displayed().and_then(FeatureCollection::bounds) {
        Some(extent) => format!("{}\n{}", title, format_extent(extent)),
        None => title,
    };
    let mut table = table(vec!["ID", "Zone", "Couleur", "Opacité"]);
    for zone in &styled {
        table.add_row(vec![
            zone.feature.properties.id.to_string(),
            zone.tooltip.clone(),
            zone.style.fill_color.to_hex(),
            format!("{:.2}", zone.style.fill_opacity),
        ]);
    }
    format!("{}\n{}", title, table)
}

/// Map framing: the extent covering every displayed zone.
pub fn format_extent((min_lon, min_lat, max_lon, max_lat): (f64, f64, f64, f64)) -> String {
    format!(
        "Emprise : lon {:.2} à {:.2}, lat {:.2} à {:.2}",
        min_lon, max_lon, min_lat, max_lat
    )
}

/// Signed-in user with the avatar initial, as shown by `atlas whoami`.
pub fn format_user(user: &User, expires_at: DateTime<Utc>) -> String {
    format!(
        "[{}] {} <{}> ({:?}), session valide jusqu'au {}",
        user.initial(),
        user.display_name(),
        user.email,
        user.role,
        expires_at.format("%d/%m/%Y %H:%M")
    )
}

pub fn format_sectors(sectors: &[&Sector], active: Option<i64>) -> String {
    if sectors.is_empty() {
        return "Aucun filtre disponible".to_string();
    }
    let mut table = table(vec!["", "ID", "Secteur", "Catégorie", "Couleur"]);
    for sector in sectors {
        table.add_row(vec![
            if active == Some(sector.id) { "●" } else { "" }.to_string(),
            sector.id.to_string(),
            sector.name.clone(),
            sector.family().label().to_string(),
            sector.color_or_default().to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_zone_stats(zone_name: &str, stats: &[ZoneStatDetail]) -> String {
    if stats.is_empty() {
        return format!("{}\nAucune donnée disponible", zone_name);
    }
    let mut table = table(vec!["Secteur", "Catégorie", "Volume"]);
    for stat in stats {
        table.add_row(vec![
            stat.sector.clone(),
            stat.category.clone().unwrap_or_default(),
            volume(stat.volume, stat.unit.as_deref()),
        ]);
    }
    format!("{}\n{}", zone_name, table)
}

fn volume(value: f64, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{} {}", format_volume(value), unit),
        None => format_volume(value),
    }
}

pub fn format_global(stats: &GlobalStats) -> String {
    let mut table = table(vec!["Statistiques globales", ""]);
    if let Some(total) = stats.total_producers {
        table.add_row(vec!["Producteurs".to_string(), format_volume(total as f64)]);
    }
    for product in &stats.top_products {
        table.add_row(vec![
            product.name.clone(),
            volume(product.volume, product.unit.as_deref()),
        ]);
    }
    table.to_string()
}

/// Tab bar of the evolution chart: `[Agriculture (2)] · Élevage (0) · Pêche (1)`.
pub fn format_evolution_tabs(evolution: &Evolution, selection: &EvolutionSelection) -> String {
    SectorFamily::TABS
        .iter()
        .map(|family| {
            let tab = format!("{} ({})", family.label(), evolution.category_count(family.key()));
            if *family == selection.family() {
                format!("[{}]", tab)
            } else {
                tab
            }
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Yearly series of the selected sectors, one column per sector.
pub fn format_evolution(evolution: &Evolution, selection: &EvolutionSelection) -> String {
    let tabs = format_evolution_tabs(evolution, selection);
    if evolution.is_empty() || selection.available().is_empty() {
        return format!("Évolution  {}\nAucune donnée", tabs);
    }
    if selection.selected().is_empty() {
        return format!("Évolution  {}\nSélectionnez au moins une filière", tabs);
    }

    let sectors = selection.selected();
    let mut header = vec!["Année"];
    header.extend(sectors.iter().map(String::as_str));
    let mut table = table(header);

    let series: Vec<Vec<(String, f64)>> = sectors.iter().map(|s| evolution.series(s)).collect();
    let mut years: Vec<&String> = series.iter().flatten().map(|(year, _)| year).collect();
    years.sort();
    years.dedup();

    for year in years {
        let mut row = vec![year.clone()];
        for points in &series {
            let cell = points
                .iter()
                .find(|(y, _)| y == year)
                .map(|(_, v)| format_volume(*v))
                .unwrap_or_else(|| "-".to_string());
            row.push(cell);
        }
        table.add_row(row);
    }

    let unchecked: Vec<&str> = selection
        .available()
        .iter()
        .filter(|s| !selection.is_selected(s))
        .map(String::as_str)
        .collect();
    if unchecked.is_empty() {
        format!("Évolution  {}\n{}", tabs, table)
    } else {
        format!(
            "Évolution  {}\n{}\nMasquées : {}",
            tabs,
            table,
            unchecked.join(", ")
        )
    }
}

/// Full zone report. `selection` picks the evolution tab; the first tab
/// is shown when it is `None`.
pub fn format_report(
    title: &str,
    report: &ZoneReport,
    selection: Option<&EvolutionSelection>,
) -> String {
    if report.is_empty() {
        return format!("{}\nAucune donnée disponible", title);
    }
    let mut sections = vec![title.to_string()];
    if let Some(global) = &report.global {
        sections.push(format_global(global));
    }
    if let Some(evolution) = &report.evolution {
        let section = match selection {
            Some(selection) => format_evolution(evolution, selection),
            None => format_evolution(evolution, &EvolutionSelection::first_tab(evolution)),
        };
        sections.push(section);
    }
    if !report.comparison.is_empty() {
        let mut table = table(vec!["Comparaison", "Valeur"]);
        for entry in &report.comparison {
            table.add_row(vec![entry.name.clone(), format_volume(entry.value)]);
        }
        sections.push(table.to_string());
    }
    sections.join("\n")
}

pub fn format_search(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "Aucun résultat".to_string();
    }
    let mut table = table(vec!["ID", "Nom", "Niveau"]);
    for result in results {
        table.add_row(vec![
            result.id.to_string(),
            result.name.clone(),
            result.level.label().to_string(),
        ]);
    }
    table.to_string()
}

/// Machine-readable variant of any serialisable result.
pub fn format_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_common::{ComparisonEntry, DivisionLevel};

    #[test]
    fn test_breadcrumbs() {
        let crumbs = vec![
            Breadcrumb {
                name: "Cameroun".to_string(),
                index: Some(0),
            },
            Breadcrumb {
                name: "Centre".to_string(),
                index: None,
            },
        ];
        assert_eq!(format_breadcrumbs(&crumbs), "Cameroun (0) › [Centre]");
    }

    #[test]
    fn test_extent() {
        assert_eq!(
            format_extent((9.5, 2.0, 16.25, 13.0)),
            "Emprise : lon 9.50 à 16.25, lat 2.00 à 13.00"
        );
    }

    #[test]
    fn test_user_line_starts_with_initial() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 3, "email": "awa@mail.cm", "firstName": "awa", "lastName": "Ndam", "role": "USER"
        }))
        .unwrap();
        let expires = DateTime::parse_from_rfc3339("2026-03-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let line = format_user(&user, expires);
        assert!(line.starts_with("[A] awa Ndam <awa@mail.cm>"), "{}", line);
        assert!(line.ends_with("01/03/2026 08:30"));
    }

    #[test]
    fn test_empty_report() {
        let text = format_report("Centre", &ZoneReport::default(), None);
        assert!(text.contains("Aucune donnée"));
    }

    #[test]
    fn test_report_lists_comparison() {
        let report = ZoneReport {
            comparison: vec![ComparisonEntry {
                name: "Mfoundi".to_string(),
                value: 7200.0,
            }],
            ..Default::default()
        };
        let text = format_report("Centre", &report, None);
        assert!(text.contains("Mfoundi"));
        assert!(text.contains("7 200"));
    }

    fn evolution() -> Evolution {
        serde_json::from_value(serde_json::json!({
            "data": [
                {"year": 2022, "Cacao": 11800.0, "Café": 760.0, "Tilapia": 410.0},
                {"year": 2023, "Cacao": 12500.0, "Café": 820.0, "Tilapia": 430.5}
            ],
            "sectors": ["Cacao", "Café", "Tilapia"],
            "categories": {"Cacao": "AGRICULTURE", "Café": "AGRICULTURE", "Tilapia": "PECHE"}
        }))
        .unwrap()
    }

    #[test]
    fn test_evolution_shows_only_selected_tab() {
        let evo = evolution();
        let selection = EvolutionSelection::for_family(&evo, SectorFamily::Peche);
        let text = format_evolution(&evo, &selection);
        assert!(text.contains("[Pêche (1)]"));
        assert!(text.contains("Agriculture (2)"));
        assert!(text.contains("430,5"));
        assert!(!text.contains("12 500"));
    }

    #[test]
    fn test_evolution_with_nothing_selected() {
        let evo = evolution();
        let mut selection = EvolutionSelection::first_tab(&evo);
        selection.toggle_all();
        assert!(format_evolution(&evo, &selection).contains("Sélectionnez au moins une filière"));

        let elevage = EvolutionSelection::for_family(&evo, SectorFamily::Elevage);
        assert!(format_evolution(&evo, &elevage).contains("Aucune donnée"));
    }

    #[test]
    fn test_search_uses_level_labels() {
        let results = vec![SearchResult {
            id: 12,
            name: "Mfoundi".to_string(),
            level: DivisionLevel::Departement,
            parent_id: Some(5),
        }];
        assert!(format_search(&results).contains("DÉPARTEMENT"));
    }
}
