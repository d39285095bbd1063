use super::model::NotificationRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
  pub subject: String,
  pub html_body: String,
  pub text_body: String,
}

pub fn confirmation_subject(restaurant_name: &str) -> String {
  format!("Reservation Confirmation - {}", restaurant_name)
}

// Field values are substituted verbatim into the HTML. Output encoding, if
// ever added, belongs here and nowhere else.
pub fn render_confirmation(req: &NotificationRequest) -> RenderedEmail {
  let html_body = format!(
    r#"<html>
<head>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background-color: #4CAF50; color: white; padding: 10px; text-align: center; }}
    .content {{ padding: 20px; }}
    .footer {{ background-color: #f1f1f1; padding: 10px; text-align: center; font-size: 12px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>Reservation Confirmation</h2>
    </div>
    <div class="content">
      <p>Hello {user_name},</p>
      <p>Your reservation at <strong>{restaurant_name}</strong> has been confirmed!</p>
      <h3>Reservation Details:</h3>
      <ul>
        <li><strong>Date and Time:</strong> {reservation_time}</li>
        <li><strong>Table Number:</strong> {table_number}</li>
      </ul>
      <p>Thank you for your reservation. We look forward to serving you!</p>
      <p>Best regards,<br>{restaurant_name} Team</p>
    </div>
    <div class="footer">
      <p>This is an automated message, please do not reply to this email.</p>
    </div>
  </div>
</body>
</html>
"#,
    user_name = req.user_name,
    restaurant_name = req.restaurant_name,
    reservation_time = req.reservation_time,
    table_number = req.table_number,
  );

  let text_body = format!(
    "Hello {user_name},\n\n\
     Your reservation at {restaurant_name} has been confirmed!\n\n\
     Reservation Details:\n\
     - Date and Time: {reservation_time}\n\
     - Table Number: {table_number}\n\n\
     Thank you for your reservation. We look forward to serving you!\n\n\
     Best regards,\n\
     {restaurant_name} Team\n",
    user_name = req.user_name,
    restaurant_name = req.restaurant_name,
    reservation_time = req.reservation_time,
    table_number = req.table_number,
  );

  RenderedEmail {
    subject: confirmation_subject(&req.restaurant_name),
    html_body,
    text_body,
  }
}
