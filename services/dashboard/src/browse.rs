//! Interactive line-oriented dashboard (`atlas browse`).

use std::io::Write;

use atlas_common::{
    Evolution, EvolutionSelection, SearchResult, SectorFamily, SectorId, Theme, ZoneId,
    ZoneProperties,
};
use drilldown::MapView;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::fetcher::Fetcher;
use crate::report;

pub const HELP: &str = "\
Commandes :
  ls                   afficher la carte
  open <id>            descendre dans une zone
  click <id>           cliquer sur une zone (statistiques si un filtre est actif)
  back                 remonter d'un niveau
  jump <i>             revenir à l'étape i du fil d'Ariane
  reset                revenir à la vue nationale
  filters [catégorie]  lister les filtres, éventuellement par catégorie
  filter <id>          activer ou désactiver un secteur
  unfilter             retirer le filtre
  stats <id>           détails de production d'une zone
  panel                panneau de statistiques de la zone courante
  tab <catégorie>      onglet de l'évolution (agriculture, elevage, peche)
  toggle <filière|all> afficher ou masquer une filière de l'évolution
  search <texte>       rechercher une zone
  theme                basculer clair / sombre
  help                 cette aide
  quit                 quitter";

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    List,
    Open(ZoneId),
    Click(ZoneId),
    Back,
    Jump(usize),
    Reset,
    Filters(Option<String>),
    Filter(SectorId),
    Unfilter,
    Stats(ZoneId),
    Panel,
    Tab(SectorFamily),
    Toggle(String),
    ToggleAll,
    Search(String),
    Theme,
    Help,
    Quit,
}

/// Parse one input line. Errors are messages for the user.
pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    let number = |what: &str| -> Result<i64, String> {
        arg.parse()
            .map_err(|_| format!("{} attend un identifiant numérique", what))
    };

    match name.to_lowercase().as_str() {
        "ls" | "list" => Ok(BrowseCommand::List),
        "open" => number("open").map(BrowseCommand::Open),
        "click" => number("click").map(BrowseCommand::Click),
        "back" => Ok(BrowseCommand::Back),
        "jump" => arg
            .parse()
            .map(BrowseCommand::Jump)
            .map_err(|_| "jump attend un index du fil d'Ariane".to_string()),
        "reset" => Ok(BrowseCommand::Reset),
        "filters" => Ok(BrowseCommand::Filters((!arg.is_empty()).then(|| arg.to_string()))),
        "filter" => number("filter").map(BrowseCommand::Filter),
        "unfilter" => Ok(BrowseCommand::Unfilter),
        "stats" => number("stats").map(BrowseCommand::Stats),
        "panel" => Ok(BrowseCommand::Panel),
        "tab" => arg
            .parse()
            .map(BrowseCommand::Tab)
            .map_err(|_| "tab attend agriculture, elevage ou peche".to_string()),
        "toggle" if arg.eq_ignore_ascii_case("all") || arg.eq_ignore_ascii_case("tout") => {
            Ok(BrowseCommand::ToggleAll)
        }
        "toggle" if !arg.is_empty() => Ok(BrowseCommand::Toggle(arg.to_string())),
        "toggle" => Err("toggle attend une filière ou all".to_string()),
        "search" if !arg.is_empty() => Ok(BrowseCommand::Search(arg.to_string())),
        "search" => Err("search attend un texte".to_string()),
        "theme" => Ok(BrowseCommand::Theme),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        other => Err(format!("Commande inconnue : {} (tapez help)", other)),
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue(String),
    Quit,
}

pub struct Browser {
    view: MapView,
    fetcher: Fetcher,
    theme: Theme,
    last_search: Vec<SearchResult>,
    /// Evolution tab and sectors for the zone whose panel is shown.
    evolution: Option<(ZoneId, EvolutionSelection)>,
}

impl Browser {
    pub fn new(root_name: &str, fetcher: Fetcher, theme: Theme) -> Self {
        Self {
            view: MapView::new(root_name),
            fetcher,
            theme,
            last_search: Vec::new(),
            evolution: None,
        }
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Load the root view and the filter list.
    pub async fn start(&mut self) -> String {
        let commands = self.view.start();
        self.fetcher.run(&mut self.view, commands).await;
        self.map()
    }

    pub async fn execute(&mut self, command: BrowseCommand) -> Step {
        debug!(?command, "Browse command");
        let text = match command {
            BrowseCommand::List => self.map(),
            BrowseCommand::Open(id) => self.open(id).await,
            BrowseCommand::Click(id) => self.click(id).await,
            BrowseCommand::Back => {
                let commands = self.view.back();
                self.fetcher.run(&mut self.view, commands).await;
                self.map()
            }
            BrowseCommand::Jump(index) => match self.view.jump_to_history(index) {
                Ok(commands) => {
                    self.fetcher.run(&mut self.view, commands).await;
                    self.map()
                }
                Err(e) => e.to_string(),
            },
            BrowseCommand::Reset => {
                let commands = self.view.reset();
                self.fetcher.run(&mut self.view, commands).await;
                self.map()
            }
            BrowseCommand::Filters(category) => {
                if category.is_some() || self.view.filter_category().is_some() {
                    self.view.set_filter_category(category);
                }
                report::format_sectors(&self.view.displayed_sectors(), self.view.overlay().active())
            }
            BrowseCommand::Filter(sector_id) => {
                let commands = self.view.select_sector(sector_id);
                self.fetcher.run(&mut self.view, commands).await;
                self.map_with_overlay_stats()
            }
            BrowseCommand::Unfilter => {
                self.view.clear_sector();
                self.map()
            }
            BrowseCommand::Stats(id) => {
                let name = self.zone_name(id).unwrap_or_else(|| format!("Zone {}", id));
                match self.fetcher.source().zone_details(id).await {
                    Ok(details) => report::format_zone_stats(&name, &details),
                    Err(e) => e.user_message(),
                }
            }
            BrowseCommand::Panel => self.panel().await,
            BrowseCommand::Tab(family) => {
                self.update_evolution(|evolution, selection| {
                    selection.switch_tab(evolution, family.key())
                })
                .await
            }
            BrowseCommand::Toggle(sector) => {
                self.update_evolution(|_, selection| selection.toggle(&sector))
                    .await
            }
            BrowseCommand::ToggleAll => {
                self.update_evolution(|_, selection| selection.toggle_all())
                    .await
            }
            BrowseCommand::Search(query) => match self.fetcher.source().search(&query).await {
                Ok(results) => {
                    let text = report::format_search(&results);
                    self.last_search = results;
                    text
                }
                Err(e) => e.user_message(),
            },
            BrowseCommand::Theme => {
                self.theme = self.theme.toggled();
                self.map()
            }
            BrowseCommand::Help => HELP.to_string(),
            BrowseCommand::Quit => return Step::Quit,
        };
        Step::Continue(text)
    }

    /// Read commands from `input` until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(output, "{}", self.start().await)?;
        let mut lines = input.lines();
        loop {
            write!(output, "atlas> ")?;
            output.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(command) => match self.execute(command).await {
                    Step::Continue(text) => writeln!(output, "{}", text)?,
                    Step::Quit => break,
                },
                Err(message) => writeln!(output, "{}", message)?,
            }
        }
        Ok(())
    }

    fn map(&self) -> String {
        report::format_map(&self.view, self.theme)
    }

    fn map_with_overlay_stats(&self) -> String {
        match self.view.overlay().stats() {
            Some(stats) => format!("{}\n{}", self.map(), report::format_global(stats)),
            None => self.map(),
        }
    }

    fn displayed_zone(&self, id: ZoneId) -> Option<ZoneProperties> {
        self.view
            .displayed()
            .or(self.view.zones())
            .and_then(|zones| zones.find(id))
            .map(|f| f.properties.clone())
    }

    fn zone_name(&self, id: ZoneId) -> Option<String> {
        self.displayed_zone(id).map(|z| z.name).or_else(|| {
            self.last_search
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.name.clone())
        })
    }

    async fn open(&mut self, id: ZoneId) -> String {
        let commands = if let Some(zone) = self.displayed_zone(id) {
            if zone.level.child().is_none() {
                return format!("{} : niveau le plus fin atteint", zone.name);
            }
            self.view.open_zone(zone.id, &zone.name, zone.level)
        } else if let Some(result) = self.last_search.iter().find(|r| r.id == id).cloned() {
            if result.level.child().is_none() {
                return format!("{} : niveau le plus fin atteint", result.name);
            }
            self.view.open_search_result(&result)
        } else {
            return format!("Zone {} introuvable dans la vue courante", id);
        };
        self.fetcher.run(&mut self.view, commands).await;
        self.map()
    }

    async fn click(&mut self, id: ZoneId) -> String {
        let Some(zone) = self.displayed_zone(id) else {
            return format!("Zone {} introuvable dans la vue courante", id);
        };
        let stats_mode = self.view.overlay().is_active();
        let commands = self.view.click(&zone);
        if commands.is_empty() {
            return format!("{} : niveau le plus fin atteint", zone.name);
        }
        self.fetcher.run(&mut self.view, commands).await;

        if stats_mode {
            let text = report::format_zone_stats(&zone.name, self.view.zone_stats());
            self.view.close_zone_stats();
            text
        } else {
            self.map()
        }
    }

    async fn panel(&mut self) -> String {
        if self.view.current().is_root() {
            return "Le panneau est disponible après avoir choisi une zone".to_string();
        }
        if !self.view.panel_visible() {
            let commands = self.view.open_panel();
            self.fetcher.run(&mut self.view, commands).await;
        }
        self.sync_evolution();
        self.render_panel()
    }

    /// Open the panel, then apply `change` to its evolution selection.
    async fn update_evolution<F>(&mut self, change: F) -> String
    where
        F: FnOnce(&Evolution, &mut EvolutionSelection),
    {
        let text = self.panel().await;
        let evolution = self.view.report().and_then(|r| r.evolution.as_ref());
        match (evolution, self.evolution.as_mut()) {
            (Some(evolution), Some((_, selection))) => {
                change(evolution, selection);
                self.render_panel()
            }
            _ => text,
        }
    }

    /// Start from the first tab whenever the panel shows another zone.
    fn sync_evolution(&mut self) {
        let zone_id = self.view.current().parent_id;
        let evolution = self.view.report().and_then(|r| r.evolution.as_ref());
        match zone_id.zip(evolution) {
            Some((zone_id, evolution)) => {
                if self.evolution.as_ref().map(|(id, _)| *id) != Some(zone_id) {
                    self.evolution = Some((zone_id, EvolutionSelection::first_tab(evolution)));
                }
            }
            None => self.evolution = None,
        }
    }

    fn render_panel(&self) -> String {
        let name = &self.view.current().name;
        match self.view.report() {
            Some(report) => report::format_report(
                name,
                report,
                self.evolution.as_ref().map(|(_, selection)| selection),
            ),
            None => format!("{}\nAucune donnée disponible", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("ls"), Ok(BrowseCommand::List));
        assert_eq!(parse_command("  open 12 "), Ok(BrowseCommand::Open(12)));
        assert_eq!(parse_command("JUMP 0"), Ok(BrowseCommand::Jump(0)));
        assert_eq!(parse_command("filters"), Ok(BrowseCommand::Filters(None)));
        assert_eq!(
            parse_command("filters peche"),
            Ok(BrowseCommand::Filters(Some("peche".to_string())))
        );
        assert_eq!(
            parse_command("search Yaoundé II"),
            Ok(BrowseCommand::Search("Yaoundé II".to_string()))
        );
        assert_eq!(parse_command("tab Pêche"), Ok(BrowseCommand::Tab(SectorFamily::Peche)));
        assert_eq!(
            parse_command("toggle Café"),
            Ok(BrowseCommand::Toggle("Café".to_string()))
        );
        assert_eq!(parse_command("toggle all"), Ok(BrowseCommand::ToggleAll));
        assert_eq!(parse_command("q"), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("open Centre").is_err());
        assert!(parse_command("jump -1").is_err());
        assert!(parse_command("search").is_err());
        assert!(parse_command("tab mines").is_err());
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("fly").unwrap_err().contains("fly"));
    }
}
