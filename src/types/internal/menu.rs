use std::fmt;
use std::str::FromStr;

/// The fixed catalogue of dashboard menu identifiers.
///
/// Menu lists are persisted as JSON arrays of these identifiers; anything
/// outside the catalogue is rejected at the API boundary instead of being
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuId {
    Home,
    Registrations,
    FormulirList,
    Formulir,
    Portofolio,
    Users,
    Roles,
    Coupons,
    Menu,
    Settings,
}

impl MenuId {
    pub const ALL: [MenuId; 10] = [
        MenuId::Home,
        MenuId::Registrations,
        MenuId::FormulirList,
        MenuId::Formulir,
        MenuId::Portofolio,
        MenuId::Users,
        MenuId::Roles,
        MenuId::Coupons,
        MenuId::Menu,
        MenuId::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuId::Home => "home",
            MenuId::Registrations => "registrations",
            MenuId::FormulirList => "formulir-list",
            MenuId::Formulir => "formulir",
            MenuId::Portofolio => "portofolio",
            MenuId::Users => "users",
            MenuId::Roles => "roles",
            MenuId::Coupons => "coupons",
            MenuId::Menu => "menu",
            MenuId::Settings => "settings",
        }
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown menu identifier: {0}")]
pub struct UnknownMenu(pub String);

impl FromStr for MenuId {
    type Err = UnknownMenu;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuId::ALL
            .iter()
            .find(|menu| menu.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownMenu(s.to_string()))
    }
}

/// Parse a list of raw menu identifiers, failing on the first unknown one.
pub fn parse_menus(raw: &[String]) -> Result<Vec<MenuId>, UnknownMenu> {
    raw.iter().map(|s| s.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_string_round_trip() {
        for menu in MenuId::ALL {
            assert_eq!(menu.as_str().parse::<MenuId>().unwrap(), menu);
        }
    }

    #[test]
    fn test_unknown_menu_is_rejected() {
        let err = "not-a-real-menu".parse::<MenuId>().unwrap_err();
        assert_eq!(err.0, "not-a-real-menu");
    }

    #[test]
    fn test_parse_menus_fails_on_first_unknown() {
        let raw = vec!["home".to_string(), "bogus".to_string()];
        assert!(parse_menus(&raw).is_err());

        let raw = vec!["home".to_string(), "settings".to_string()];
        assert_eq!(
            parse_menus(&raw).unwrap(),
            vec![MenuId::Home, MenuId::Settings]
        );
    }
}
