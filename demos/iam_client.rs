//! Interactive IAM client over plain CoAP/UDP
//!
//! A REPL for poking at the IAM resources of a test device that listens
//! without DTLS. Password pairing needs the SDK's authenticated transport
//! and is not available here.
//!
//! Usage:
//!   cargo run --example iam_client -- [--server 127.0.0.1:5683]
//!
//! Commands:
//!   details                   - Device details and pairing modes
//!   pair-initial              - Local Initial pairing
//!   pair-open <username>      - Local Open pairing
//!   me                        - Current user
//!   users                     - List usernames
//!   user <username>           - Show a user
//!   roles                     - List roles
//!   settings                  - Show IAM settings
//!   setting <name> <on|off>   - Toggle local-open, password-open or password-invite pairing
//!   name <friendly name>      - Set the device friendly name
//!   delete <username>         - Delete a user
//!   help                      - Show commands
//!   quit                      - Exit

use clap::Parser;
use coap_lite::{
    CoapOption, ContentFormat as CoapContentFormat, MessageClass, MessageType, Packet,
    RequestType,
};
use edge_iam::coap_types::{ContentFormat, Method, Request, Response};
use edge_iam::{Connection, ConnectionError};
use futures::executor::block_on;
use std::io::{self, Write};
use std::net::UdpSocket;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "iam-client")]
#[command(about = "Interactive client for device IAM endpoints")]
struct Args {
    /// Device address
    #[arg(long, default_value = "127.0.0.1:5683")]
    server: String,

    /// Response timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,
}

struct UdpConnection {
    socket: UdpSocket,
    message_id: Mutex<u16>,
}

impl UdpConnection {
    fn new(server: &str, timeout: Duration) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_read_timeout(Some(timeout))?;
        socket.connect(server)?;

        Ok(Self {
            socket,
            message_id: Mutex::new(1),
        })
    }

    fn next_message_id(&self) -> u16 {
        let mut id = self.message_id.lock().unwrap_or_else(|e| e.into_inner());
        let current = *id;
        *id = id.wrapping_add(1);
        current
    }

    fn exchange(&self, request: &Request) -> io::Result<Response> {
        let message_id = self.next_message_id();
        let mut packet = Packet::new();
        packet.header.message_id = message_id;
        packet.header.code = MessageClass::Request(match request.method {
            Method::Get => RequestType::Get,
            Method::Post => RequestType::Post,
            Method::Put => RequestType::Put,
            Method::Delete => RequestType::Delete,
        });
        packet.header.set_type(MessageType::Confirmable);
        packet.set_token(message_id.to_be_bytes().to_vec());
        for segment in request.path.split('/').filter(|s| !s.is_empty()) {
            packet.add_option(CoapOption::UriPath, segment.as_bytes().to_vec());
        }

        if !request.payload.is_empty() {
            packet.payload = request.payload.clone();
            if let Some(ContentFormat::Cbor) = request.content_format {
                packet.set_content_format(CoapContentFormat::ApplicationCBOR);
            }
        }

        let bytes = packet
            .to_bytes()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.socket.send(&bytes)?;

        let mut buf = [0u8; 1500];
        let len = self.socket.recv(&mut buf)?;
        let response = Packet::from_bytes(&buf[..len])
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

        let code = u8::from(response.header.code);
        Ok(Response {
            status: u16::from(code >> 5) * 100 + u16::from(code & 0x1f),
            payload: response.payload,
            content_format: None,
        })
    }
}

impl Connection for UdpConnection {
    async fn coap(&self, request: Request) -> Result<Response, ConnectionError> {
        self.exchange(&request).map_err(|e| match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ConnectionError::Sdk {
                code: -1,
                message: "timeout - no response".to_string(),
            },
            _ => ConnectionError::Sdk {
                code: -1,
                message: e.to_string(),
            },
        })
    }

    async fn password_authenticate(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<(), ConnectionError> {
        Err(ConnectionError::Sdk {
            code: -1,
            message: "password authentication needs a DTLS connection".to_string(),
        })
    }
}

fn report<T: std::fmt::Debug>(result: edge_iam::Result<T>) {
    match result {
        Ok(value) => println!("  {:#?}", value),
        Err(e) => println!("  Error: {}", e),
    }
}

fn print_help() {
    println!("\nCommands:");
    println!("  details                    Device details and pairing modes");
    println!("  pair-initial               Local Initial pairing");
    println!("  pair-open <username>       Local Open pairing");
    println!("  me                         Current user");
    println!("  users                      List usernames");
    println!("  user <username>            Show a user");
    println!("  roles                      List roles");
    println!("  settings                   Show IAM settings");
    println!("  setting <name> <on|off>    Toggle local-open, password-open or password-invite");
    println!("  name <friendly name>       Set the device friendly name");
    println!("  delete <username>          Delete a user");
    println!("  help                       Show this help");
    println!("  quit                       Exit");
    println!();
}

fn run_command(conn: &UdpConnection, cmd: &str, rest: &str) {
    match cmd {
        "details" => match block_on(edge_iam::get_device_details(conn)) {
            Ok(details) => {
                println!("  Product:  {}", details.product_id);
                println!("  Device:   {}", details.device_id);
                println!("  Version:  {}", details.nabto_version);
                if let Some(name) = &details.friendly_name {
                    println!("  Name:     {}", name);
                }
                let modes: Vec<_> = details
                    .pairing_modes()
                    .iter()
                    .map(|m| m.to_string())
                    .collect();
                println!("  Pairing:  {}", modes.join(", "));
            }
            Err(e) => println!("  Error: {}", e),
        },
        "pair-initial" => report(block_on(edge_iam::pair_local_initial(conn))),
        "pair-open" if !rest.is_empty() => report(block_on(edge_iam::pair_local_open(conn, rest))),
        "me" => match block_on(edge_iam::get_current_user(conn)) {
            Ok(user) => match serde_json::to_string_pretty(&user) {
                Ok(json) => {
                    for line in json.lines() {
                        println!("  {}", line);
                    }
                }
                Err(e) => println!("  Error: {}", e),
            },
            Err(e) => println!("  Error: {}", e),
        },
        "users" => report(block_on(edge_iam::list_users(conn))),
        "user" if !rest.is_empty() => report(block_on(edge_iam::get_user(conn, rest))),
        "roles" => report(block_on(edge_iam::list_roles(conn))),
        "settings" => report(block_on(edge_iam::get_iam_settings(conn))),
        "setting" => {
            let mut parts = rest.split_whitespace();
            let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                println!("Usage: setting <name> <on|off>");
                return;
            };
            let enabled = matches!(value, "on" | "true" | "1");
            let result = match name {
                "local-open" => {
                    block_on(edge_iam::update_iam_settings_local_open_pairing(conn, enabled))
                }
                "password-open" => block_on(
                    edge_iam::update_iam_settings_password_open_pairing(conn, enabled),
                ),
                "password-invite" => block_on(
                    edge_iam::update_iam_settings_password_invite_pairing(conn, enabled),
                ),
                _ => {
                    println!("Unknown setting: {}", name);
                    return;
                }
            };
            report(result);
        }
        "name" if !rest.is_empty() => {
            report(block_on(edge_iam::update_device_friendly_name(conn, rest)))
        }
        "delete" if !rest.is_empty() => report(block_on(edge_iam::delete_user(conn, rest))),
        "pair-open" | "user" | "name" | "delete" => println!("Usage: {} <argument>", cmd),
        _ => println!("Unknown command: {}. Type 'help' for commands.", cmd),
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    println!("IAM client, device at {}", args.server);
    let conn = UdpConnection::new(&args.server, Duration::from_secs(args.timeout))?;

    println!("Type 'help' for commands, 'quit' to exit.\n");

    loop {
        print!("iam> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((c, r)) => (c.to_lowercase(), r.trim()),
            None => (input.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Bye!");
                break;
            }
            "help" | "?" => print_help(),
            other => run_command(&conn, other, rest),
        }
        println!();
    }

    Ok(())
}
