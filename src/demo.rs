//! Demo sections driven by `sqassistant run`.
//!
//! Three stand-in subsystems (network, database, main window) that print
//! what they would do. A section listed in `fail` refuses to start, which
//! is how the CLI exercises rollback.

use anyhow::{Result, bail};
use console::style;
use serde::{Deserialize, Serialize};

use crate::section::{Section, Typed, TypedSection};

pub const NETWORK: &str = "network";
pub const DATABASE: &str = "database";
pub const WINDOW: &str = "window";

/// Demo section names in start order.
pub fn names() -> &'static [&'static str] {
    &[NETWORK, DATABASE, WINDOW]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseData {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowData {
    /// x, y, width, height
    pub geometry: (i32, i32, u32, u32),
}

fn report_start(name: &str, ok: bool) -> bool {
    if !ok {
        println!("  {} {} refused to start", style("✗").red(), name);
    }
    ok
}

#[derive(Debug, Default)]
pub struct NetworkManager {
    fail: bool,
}

impl TypedSection for NetworkManager {
    type Data = NetworkData;

    fn name(&self) -> &str {
        NETWORK
    }

    fn default_data(&self) -> NetworkData {
        NetworkData {
            host: "localhost".to_string(),
            port: 8000,
        }
    }

    fn start(&mut self, data: NetworkData) -> bool {
        println!("Starting network, connecting to {}:{}", data.host, data.port);
        report_start(NETWORK, !self.fail)
    }

    fn quit(&mut self) -> Option<NetworkData> {
        println!("Stopping network, disconnecting");
        None
    }
}

#[derive(Debug, Default)]
pub struct DbManager {
    fail: bool,
}

impl TypedSection for DbManager {
    type Data = DatabaseData;

    fn name(&self) -> &str {
        DATABASE
    }

    fn default_data(&self) -> DatabaseData {
        DatabaseData {
            path: "example.db".to_string(),
        }
    }

    fn start(&mut self, data: DatabaseData) -> bool {
        println!("Starting database, opening {}", data.path);
        report_start(DATABASE, !self.fail)
    }

    fn quit(&mut self) -> Option<DatabaseData> {
        println!("Closing database");
        Some(DatabaseData {
            path: "newPath.db".to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MainWindow {
    fail: bool,
}

impl TypedSection for MainWindow {
    type Data = WindowData;

    fn name(&self) -> &str {
        WINDOW
    }

    fn default_data(&self) -> WindowData {
        WindowData {
            geometry: (123, 456, 640, 480),
        }
    }

    fn start(&mut self, data: WindowData) -> bool {
        let (x, y, w, h) = data.geometry;
        println!("Starting main window at {x},{y} ({w}x{h})");
        report_start(WINDOW, !self.fail)
    }

    fn quit(&mut self) -> Option<WindowData> {
        println!("Closing main window");
        None
    }
}

/// Build the demo sections, forcing the ones named in `fail` to fail.
pub fn sections(fail: &[String]) -> Result<Vec<Box<dyn Section>>> {
    for name in fail {
        if !names().contains(&name.as_str()) {
            bail!(
                "Unknown section '{}'. Valid values: {}",
                name,
                names().join(", ")
            );
        }
    }
    let fails = |name: &str| fail.iter().any(|f| f == name);

    let sections: Vec<Box<dyn Section>> = vec![
        Box::new(Typed::new(NetworkManager {
            fail: fails(NETWORK),
        })),
        Box::new(Typed::new(DbManager {
            fail: fails(DATABASE),
        })),
        Box::new(Typed::new(MainWindow {
            fail: fails(WINDOW),
        })),
    ];
    Ok(sections)
}
