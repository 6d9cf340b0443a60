use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

// Database connection manager
pub struct Database {
    pub pool: MySqlPool,
}

const SCHEMA: [&str; 6] = [
    "CREATE TABLE IF NOT EXISTS airport (
        airport_code VARCHAR(8) NOT NULL PRIMARY KEY,
        airport_name VARCHAR(255) NOT NULL,
        city VARCHAR(255) NOT NULL,
        country VARCHAR(255) NOT NULL,
        latitude DOUBLE NOT NULL,
        longitude DOUBLE NOT NULL,
        time_zone VARCHAR(64) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS airline (
        iata_code VARCHAR(3) NOT NULL PRIMARY KEY,
        airline_name VARCHAR(255) NOT NULL,
        airport_base VARCHAR(255) NOT NULL,
        username VARCHAR(50) NOT NULL,
        password VARCHAR(255) NOT NULL,
        CONSTRAINT airline_username_uindex UNIQUE (username)
    )",
    "CREATE TABLE IF NOT EXISTS administrator (
        admin_id BIGINT AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        username VARCHAR(50) NOT NULL,
        password VARCHAR(255) NOT NULL,
        CONSTRAINT administrator_username_uindex UNIQUE (username)
    )",
    "CREATE TABLE IF NOT EXISTS customer (
        customer_id BIGINT AUTO_INCREMENT PRIMARY KEY,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        address VARCHAR(255) NOT NULL,
        phone_number VARCHAR(16) NOT NULL,
        credit_card_number VARCHAR(19) NOT NULL,
        username VARCHAR(50) NOT NULL,
        password VARCHAR(255) NOT NULL,
        CONSTRAINT customer_username_uindex UNIQUE (username)
    )",
    "CREATE TABLE IF NOT EXISTS flight (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        flight_number VARCHAR(10) NOT NULL,
        airline_code VARCHAR(3) NOT NULL,
        origin_airport VARCHAR(8) NOT NULL,
        destination_airport VARCHAR(8) NOT NULL,
        flight_date DATE NOT NULL,
        departure_time_local TIME NOT NULL,
        landing_time_local TIME NOT NULL,
        capacity INT NOT NULL,
        remaining_tickets INT NOT NULL,
        flight_status VARCHAR(16) DEFAULT 'SCHEDULED' NOT NULL,
        version INT DEFAULT 0 NOT NULL,
        CONSTRAINT flight_remaining_range CHECK (remaining_tickets >= 0 AND remaining_tickets <= capacity),
        CONSTRAINT flight_airline_iata_code_fk
            FOREIGN KEY (airline_code) REFERENCES airline(iata_code)
            ON UPDATE CASCADE,
        CONSTRAINT flight_origin_airport_fk
            FOREIGN KEY (origin_airport) REFERENCES airport(airport_code),
        CONSTRAINT flight_destination_airport_fk
            FOREIGN KEY (destination_airport) REFERENCES airport(airport_code)
    )",
    "CREATE TABLE IF NOT EXISTS ticket (
        ticket_id CHAR(12) NOT NULL PRIMARY KEY,
        customer_id BIGINT NOT NULL,
        flight_id BIGINT NOT NULL,
        class_type VARCHAR(16) NOT NULL,
        seat_number VARCHAR(8) NOT NULL,
        booking_status VARCHAR(16) NOT NULL,
        price DECIMAL(10,2) NOT NULL,
        created_at TIMESTAMP(6) NOT NULL,
        INDEX ticket_status_created_index (booking_status, created_at),
        CONSTRAINT ticket_customer_id_fk
            FOREIGN KEY (customer_id) REFERENCES customer(customer_id)
            ON DELETE CASCADE,
        CONSTRAINT ticket_flight_id_fk
            FOREIGN KEY (flight_id) REFERENCES flight(id)
            ON DELETE CASCADE
    )",
];

impl Database {
    // Create a new database connection pool
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    // Create any missing tables; existing tables are left as they are
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        for create_sql in SCHEMA {
            sqlx::query(create_sql).execute(&self.pool).await?;
        }
        tracing::info!(tables = SCHEMA.len(), "database schema ready");
        Ok(())
    }

    // Get a reference to the connection pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }
}
