//! Configuration templates, loaded once as immutable constants.
//!
//! Placeholders use `$name` / `${name}` and are filled by [`super::Template`].
//! `$$` survives rendering as a literal `$`; nginx runtime variables
//! (`$host`, `$uri`, ...) are written that way so they reach the final
//! config untouched.

use super::Template;

/// Systemd unit for the supervised application process
pub const SYSTEMD_UNIT: Template = Template::new(
    "systemd-unit",
    "\
[Unit]
Description=$service_name service
After=network.target

[Service]
User=$user
Group=$group
WorkingDirectory=$project_path
ExecStart=$exec_start
Restart=always
RestartSec=5
Environment=PATH=$venv_path/bin:/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin
$environment_vars

[Install]
WantedBy=multi-user.target
",
);

/// Plain HTTP reverse proxy, API only
pub const NGINX_HTTP: Template = Template::new(
    "nginx-http",
    "\
server {
    listen 80;
    server_name $domain;

    location / {
        proxy_pass http://localhost:$port;
        proxy_set_header Host $$host;
        proxy_set_header X-Real-IP $$remote_addr;
        proxy_set_header X-Forwarded-For $$proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $$scheme;
    }
}
",
);

/// HTTP to HTTPS redirect plus TLS-terminated reverse proxy, API only
pub const NGINX_HTTPS: Template = Template::new(
    "nginx-https",
    "\
server {
    listen 80;
    server_name $domain;
    return 301 https://$domain$$request_uri;
}

server {
    listen 443 ssl;
    server_name $domain;

    ssl_certificate /etc/letsencrypt/live/$domain/fullchain.pem;
    ssl_certificate_key /etc/letsencrypt/live/$domain/privkey.pem;
    ssl_protocols TLSv1.2 TLSv1.3;
    ssl_prefer_server_ciphers on;
    ssl_ciphers ECDHE-RSA-AES256-GCM-SHA512:DHE-RSA-AES256-GCM-SHA512:ECDHE-RSA-AES256-GCM-SHA384:DHE-RSA-AES256-GCM-SHA384;

    location / {
        proxy_pass http://localhost:$port;
        proxy_set_header Host $$host;
        proxy_set_header X-Real-IP $$remote_addr;
        proxy_set_header X-Forwarded-For $$proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $$scheme;
    }
}
",
);

/// Plain HTTP, API under a prefix plus static frontend with SPA fallback
pub const NGINX_HTTP_FRONTEND: Template = Template::new(
    "nginx-http-frontend",
    "\
server {
    listen 80;
    server_name $domain;

    # API endpoints
    location $api_url_prefix/ {
        proxy_pass http://localhost:$port$api_url_prefix/;
        proxy_set_header Host $$host;
        proxy_set_header X-Real-IP $$remote_addr;
        proxy_set_header X-Forwarded-For $$proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $$scheme;
    }

    # Frontend static files
    location $frontend_url_prefix {
        alias $frontend_path/;
        try_files $$uri $$uri/ $frontend_url_prefix/index.html;
        expires 1d;
        add_header Cache-Control \"public\";
    }
}
",
);

/// TLS-terminated variant of the frontend + API layout
pub const NGINX_HTTPS_FRONTEND: Template = Template::new(
    "nginx-https-frontend",
    "\
server {
    listen 80;
    server_name $domain;
    return 301 https://$domain$$request_uri;
}

server {
    listen 443 ssl;
    server_name $domain;

    ssl_certificate /etc/letsencrypt/live/$domain/fullchain.pem;
    ssl_certificate_key /etc/letsencrypt/live/$domain/privkey.pem;
    ssl_protocols TLSv1.2 TLSv1.3;
    ssl_prefer_server_ciphers on;
    ssl_ciphers ECDHE-RSA-AES256-GCM-SHA512:DHE-RSA-AES256-GCM-SHA512:ECDHE-RSA-AES256-GCM-SHA384:DHE-RSA-AES256-GCM-SHA384;

    # API endpoints
    location $api_url_prefix/ {
        proxy_pass http://localhost:$port$api_url_prefix/;
        proxy_set_header Host $$host;
        proxy_set_header X-Real-IP $$remote_addr;
        proxy_set_header X-Forwarded-For $$proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $$scheme;
    }

    # Frontend static files
    location $frontend_url_prefix {
        alias $frontend_path/;
        try_files $$uri $$uri/ $frontend_url_prefix/index.html;
        expires 1d;
        add_header Cache-Control \"public\";
    }
}
",
);
