use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Option<Route>,
    pub items: Vec<MenuItem>,
}

impl MenuItem {
    fn link(label: &'static str, route: Route) -> Self {
        Self {
            label,
            route: Some(route),
            items: Vec::new(),
        }
    }

    fn group(label: &'static str, items: Vec<MenuItem>) -> Self {
        Self {
            label,
            route: None,
            items,
        }
    }

    fn visible(&self, authenticated: bool) -> Option<MenuItem> {
        if self.route.is_some_and(|r| r.is_protected()) && !authenticated {
            return None;
        }
        let items: Vec<_> = self
            .items
            .iter()
            .filter_map(|item| item.visible(authenticated))
            .collect();
        if self.route.is_none() && items.is_empty() {
            return None;
        }
        Some(MenuItem {
            label: self.label,
            route: self.route,
            items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub label: &'static str,
    pub items: Vec<MenuItem>,
}

impl MenuSection {
    /// Drops the entries the session may not see; `None` when nothing is left.
    pub fn visible(&self, authenticated: bool) -> Option<MenuSection> {
        let items: Vec<_> = self
            .items
            .iter()
            .filter_map(|item| item.visible(authenticated))
            .collect();
        (!items.is_empty()).then(|| MenuSection {
            label: self.label,
            items,
        })
    }
}

pub fn back_office_menu() -> Vec<MenuSection> {
    vec![
        MenuSection {
            label: "Home",
            items: vec![MenuItem::link("Dashboard", Route::Dashboard)],
        },
        MenuSection {
            label: "User management",
            items: vec![MenuItem::link("Users", Route::Users)],
        },
        MenuSection {
            label: "Category management",
            items: vec![MenuItem::link("Categories", Route::Categories)],
        },
        MenuSection {
            label: "Product management",
            items: vec![MenuItem::link("Products", Route::Products)],
        },
        MenuSection {
            label: "Pages",
            items: vec![
                MenuItem::link("Landing", Route::Landing),
                MenuItem::group(
                    "Auth",
                    vec![
                        MenuItem::link("Login", Route::Login),
                        MenuItem::link("Error", Route::Error),
                        MenuItem::link("Access Denied", Route::AccessDenied),
                    ],
                ),
                MenuItem::link("Not Found", Route::NotFound),
            ],
        },
    ]
}
