use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;

use taskflow::alarm::LogDispatcher;
use taskflow::notify::LogNotifier;
use taskflow::task::{Category, Repeat, Task};
use taskflow::utils::print_task_list;
use taskflow::{AlarmPoller, TaskFlow, TaskStore};

#[tokio::main]
async fn main() {
    env_logger::init();

    let path = std::env::temp_dir().join("taskflow-demo.json");
    let store = match TaskStore::from_file(&path) {
        Ok(store) => store,
        Err(_) => TaskStore::new(&path),
    };

    let mut app = TaskFlow::new(store, LogDispatcher::new(), LogNotifier::default());

    if app.store().tasks().is_empty() {
        let now = Local::now().naive_local();
        // A task due on the very next minute, so the demo has something to ring about
        let next_minute = now + chrono::Duration::minutes(1);
        let mut task = Task::new(
            "Stretch your legs".to_string(),
            next_minute.date(),
            next_minute.time(),
            Category::Personal,
        ).unwrap();
        task.set_repeat(Repeat::Daily);
        app.add_task(task);
    }

    println!("Current tasks:");
    print_task_list(app.store().tasks());

    let app = Arc::new(Mutex::new(app));
    let poller = AlarmPoller::spawn(Arc::clone(&app));

    println!("Polling for two minutes, watch the logs...");
    tokio::time::sleep(std::time::Duration::from_secs(120)).await;

    poller.stop();
    app.lock().await.dismiss_alarm().await;
}
